use serde::{Deserialize, Serialize};

// 考勤状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AttendanceStatus {
    Present,
    #[default]
    Absent,
}

impl AttendanceStatus {
    pub const PRESENT: &'static str = "Present";
    pub const ABSENT: &'static str = "Absent";
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "{}", AttendanceStatus::PRESENT),
            AttendanceStatus::Absent => write!(f, "{}", AttendanceStatus::ABSENT),
        }
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AttendanceStatus::PRESENT => Ok(AttendanceStatus::Present),
            AttendanceStatus::ABSENT => Ok(AttendanceStatus::Absent),
            _ => Err(format!("Invalid attendance status: {s}")),
        }
    }
}

/// 考勤记录（含学生姓名）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendanceRecord {
    pub student_id: i64,
    pub student_name: String,
    pub session_date: String,
    pub status: AttendanceStatus,
}
