use serde::Deserialize;

use super::entities::AttendanceStatus;

/// 单个学生的考勤标记
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceMark {
    pub student_id: i64,
    pub status: Option<AttendanceStatus>, // 缺省视为缺勤
}

/// 批量记录考勤请求
#[derive(Debug, Clone, Deserialize)]
pub struct MarkAttendanceRequest {
    pub course_id: Option<i64>,
    pub date: Option<String>, // YYYY-MM-DD
    pub records: Option<Vec<AttendanceMark>>,
}

/// 考勤查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceRecordQuery {
    pub course_id: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
}
