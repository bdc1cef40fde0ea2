use std::sync::Arc;

use tracing::info;

use crate::errors::{CampusError, Result};
use crate::models::assignments::{entities::Assignment, requests::CreateAssignmentRequest};
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::validate_session_date;

pub struct AssignmentService {
    storage: Arc<dyn Storage>,
}

impl AssignmentService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 作业列表，可按课程筛选，按截止日期排序
    pub async fn list(&self, course_id: Option<i64>) -> Result<Vec<Assignment>> {
        self.storage.list_assignments(course_id).await
    }

    /// 布置作业（仅教职工）
    pub async fn create(&self, actor: &User, mut req: CreateAssignmentRequest) -> Result<Assignment> {
        if !actor.role.is_staff() {
            return Err(CampusError::authorization("Faculty access required"));
        }

        req.title = req.title.trim().to_string();
        if req.title.is_empty() {
            return Err(CampusError::validation("title required"));
        }
        if let Some(due) = req.due_date.as_deref() {
            req.due_date = Some(validate_session_date(due)?);
        }

        let assignment = self.storage.create_assignment(req).await?;
        info!(
            "Assignment {} created for course {} by user {}",
            assignment.id, assignment.course_id, actor.id
        );
        Ok(assignment)
    }
}
