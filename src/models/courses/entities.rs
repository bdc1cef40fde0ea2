use serde::{Deserialize, Serialize};

/// 课程
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub code: String,
}

/// 课程花名册中的学生
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterStudent {
    pub id: i64,
    pub name: String,
    pub email: String,
}
