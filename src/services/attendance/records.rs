use super::AttendanceService;
use crate::errors::{CampusError, Result};
use crate::models::attendance::{entities::AttendanceRecord, requests::AttendanceRecordQuery};
use crate::models::users::entities::User;
use crate::utils::validate_session_date;

pub async fn list_records(
    service: &AttendanceService,
    _actor: &User,
    mut query: AttendanceRecordQuery,
) -> Result<Vec<AttendanceRecord>> {
    if query.course_id.is_none() {
        return Err(CampusError::validation("courseId required"));
    }

    // 日期按字符串比较，先规范化
    query.from = query.from.as_deref().map(validate_session_date).transpose()?;
    query.to = query.to.as_deref().map(validate_session_date).transpose()?;

    service.get_storage().list_attendance_records(query).await
}
