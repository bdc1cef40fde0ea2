//! 考勤存储操作

use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, DbBackend, EntityTrait, QueryTrait, Value};
use tracing::debug;

use super::Store;
use crate::entity::attendance::{ActiveModel, Column, Entity as Attendance};
use crate::errors::{CampusError, Result};
use crate::models::attendance::{
    entities::{AttendanceRecord, AttendanceStatus},
    requests::AttendanceRecordQuery,
};

#[derive(sea_orm::FromQueryResult)]
struct AttendanceRow {
    student_id: i64,
    student_name: String,
    session_date: String,
    status: String,
}

impl Store {
    /// 批量记录考勤：同一 (课程, 学生, 日期) 覆盖旧状态，全部记录在一个事务内
    pub async fn mark_attendance_impl(
        &self,
        course_id: i64,
        session_date: &str,
        marked_by: i64,
        marks: Vec<(i64, AttendanceStatus)>,
    ) -> Result<usize> {
        let statements: Vec<_> = marks
            .into_iter()
            .map(|(student_id, status)| {
                Attendance::insert(ActiveModel {
                    course_id: Set(course_id),
                    student_id: Set(student_id),
                    session_date: Set(session_date.to_string()),
                    status: Set(status.to_string()),
                    marked_by: Set(Some(marked_by)),
                    ..Default::default()
                })
                .on_conflict(
                    OnConflict::columns([Column::CourseId, Column::StudentId, Column::SessionDate])
                        .update_columns([Column::Status, Column::MarkedBy])
                        .to_owned(),
                )
                .build(DbBackend::Sqlite)
            })
            .collect();

        let written = self
            .transaction(move |txn| {
                Box::pin(async move {
                    let count = statements.len();
                    for stmt in statements {
                        txn.mutate(stmt).await?;
                    }
                    Ok(count)
                })
            })
            .await?;

        debug!(
            "Marked {} attendance record(s) for course {} on {}",
            written, course_id, session_date
        );
        Ok(written)
    }

    /// 查询课程考勤，可选日期范围；按日期倒序、姓名正序
    pub async fn list_attendance_records_impl(
        &self,
        query: AttendanceRecordQuery,
    ) -> Result<Vec<AttendanceRecord>> {
        let mut sql = String::from(
            "SELECT a.student_id, u.name AS student_name, a.session_date, a.status \
             FROM attendance a \
             JOIN users u ON u.id = a.student_id \
             WHERE a.course_id = ?",
        );
        let mut values: Vec<Value> = vec![query.course_id.into()];

        if let Some(from) = query.from {
            sql.push_str(" AND a.session_date >= ?");
            values.push(from.into());
        }
        if let Some(to) = query.to {
            sql.push_str(" AND a.session_date <= ?");
            values.push(to.into());
        }
        sql.push_str(" ORDER BY a.session_date DESC, u.name");

        let rows: Vec<AttendanceRow> = self.query_many(Store::statement(&sql, values)).await?;

        rows.into_iter()
            .map(|r| {
                let status = r
                    .status
                    .parse::<AttendanceStatus>()
                    .map_err(CampusError::database_operation)?;
                Ok(AttendanceRecord {
                    student_id: r.student_id,
                    student_name: r.student_name,
                    session_date: r.session_date,
                    status,
                })
            })
            .collect()
    }
}
