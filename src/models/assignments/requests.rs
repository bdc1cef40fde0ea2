use serde::Deserialize;

/// 创建作业请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>, // YYYY-MM-DD
}
