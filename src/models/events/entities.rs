use serde::{Deserialize, Serialize};

/// 校园活动
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_date: Option<String>,
}
