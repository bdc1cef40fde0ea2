//! 提交存储操作

use sea_orm::{ActiveValue::Set, DbBackend, EntityTrait, QueryTrait, Value};

use super::Store;
use crate::entity::submissions::{ActiveModel, Entity as Submissions, Model};
use crate::errors::{CampusError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionListItem},
    requests::NewSubmission,
};

#[derive(sea_orm::FromQueryResult)]
struct SubmissionRow {
    id: i64,
    assignment_id: i64,
    assignment_title: String,
    student_id: i64,
    student_name: String,
    file_name: Option<String>,
    submitted_at: i64,
    feedback_text: Option<String>,
    score: Option<i32>,
}

impl Store {
    /// 创建提交（只追加，不更新）
    pub async fn create_submission_impl(&self, req: NewSubmission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let stmt = Submissions::insert(ActiveModel {
            assignment_id: Set(req.assignment_id),
            student_id: Set(req.student_id),
            file_path: Set(req.file_path),
            file_name: Set(req.file_name),
            submitted_at: Set(now),
            feedback_text: Set(Some(req.feedback_text)),
            score: Set(Some(req.score)),
            ..Default::default()
        })
        .build(DbBackend::Sqlite);

        let id = self.mutate(stmt).await?.last_insert_id() as i64;

        let model: Option<Model> = self
            .query_one(Submissions::find_by_id(id).build(DbBackend::Sqlite))
            .await?;
        model
            .map(|m| m.into_submission())
            .ok_or_else(|| CampusError::database_operation(format!("新建提交 {id} 读取失败")))
    }

    /// 列出提交，最新的在前；`student_id` 为空时返回全部
    pub async fn list_submissions_impl(
        &self,
        student_id: Option<i64>,
    ) -> Result<Vec<SubmissionListItem>> {
        let mut sql = String::from(
            "SELECT s.id, s.assignment_id, a.title AS assignment_title, s.student_id, \
             u.name AS student_name, s.file_name, s.submitted_at, s.feedback_text, s.score \
             FROM submissions s \
             JOIN assignments a ON a.id = s.assignment_id \
             JOIN users u ON u.id = s.student_id",
        );
        let mut values: Vec<Value> = Vec::new();

        if let Some(student_id) = student_id {
            sql.push_str(" WHERE s.student_id = ?");
            values.push(student_id.into());
        }
        sql.push_str(" ORDER BY s.submitted_at DESC, s.id DESC");

        let rows: Vec<SubmissionRow> = self.query_many(Store::statement(&sql, values)).await?;

        Ok(rows
            .into_iter()
            .map(|r| SubmissionListItem {
                id: r.id,
                assignment_id: r.assignment_id,
                assignment_title: r.assignment_title,
                student_id: r.student_id,
                student_name: r.student_name,
                file_name: r.file_name,
                submitted_at: chrono::DateTime::from_timestamp(r.submitted_at, 0)
                    .unwrap_or_default(),
                feedback_text: r.feedback_text,
                score: r.score,
            })
            .collect())
    }
}
