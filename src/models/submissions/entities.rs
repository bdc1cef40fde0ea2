use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 作业提交（创建后不再修改）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub file_path: Option<String>,
    pub file_name: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub feedback_text: Option<String>,
    pub score: Option<i32>,
}

/// 提交列表项（含作业标题与学生姓名）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionListItem {
    pub id: i64,
    pub assignment_id: i64,
    pub assignment_title: String,
    pub student_id: i64,
    pub student_name: String,
    pub file_name: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub feedback_text: Option<String>,
    pub score: Option<i32>,
}
