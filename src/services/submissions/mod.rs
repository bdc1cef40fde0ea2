pub mod list;
pub mod submit;

use std::sync::Arc;

use crate::errors::Result;
use crate::evaluation::Evaluator;
use crate::models::submissions::{
    entities::SubmissionListItem, requests::CreateSubmissionRequest, responses::SubmissionResult,
};
use crate::models::users::entities::User;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Arc<dyn Storage>,
    evaluator: Arc<Evaluator>,
}

impl SubmissionService {
    pub fn new(storage: Arc<dyn Storage>, evaluator: Arc<Evaluator>) -> Self {
        Self { storage, evaluator }
    }

    pub(crate) fn get_storage(&self) -> Arc<dyn Storage> {
        self.storage.clone()
    }

    pub(crate) fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    // 学生提交作业并自动评分
    pub async fn submit(
        &self,
        actor: &User,
        req: CreateSubmissionRequest,
    ) -> Result<SubmissionResult> {
        submit::submit_assignment(self, actor, req).await
    }

    // 学生看自己的提交，教职工看全部
    pub async fn list(&self, actor: &User) -> Result<Vec<SubmissionListItem>> {
        list::list_submissions(self, actor).await
    }
}
