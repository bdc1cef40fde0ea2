use tracing::info;

use super::AttendanceService;
use crate::errors::{CampusError, Result};
use crate::models::attendance::requests::MarkAttendanceRequest;
use crate::models::users::entities::User;
use crate::utils::validate_session_date;

pub async fn mark_attendance(
    service: &AttendanceService,
    actor: &User,
    req: MarkAttendanceRequest,
) -> Result<usize> {
    // 权限校验
    if !actor.role.is_staff() {
        return Err(CampusError::authorization("Faculty access required"));
    }

    let (Some(course_id), Some(date), Some(records)) = (req.course_id, req.date, req.records)
    else {
        return Err(CampusError::validation(
            "courseId, date, and records required",
        ));
    };
    let session_date = validate_session_date(&date)?;

    // 未给出状态的学生按缺勤记录
    let marks: Vec<_> = records
        .into_iter()
        .map(|r| (r.student_id, r.status.unwrap_or_default()))
        .collect();

    let written = service
        .get_storage()
        .mark_attendance(course_id, &session_date, actor.id, marks)
        .await?;

    info!(
        "User {} marked attendance for course {} on {} ({} records)",
        actor.id, course_id, session_date, written
    );
    Ok(written)
}
