pub mod mark;
pub mod records;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::attendance::{
    entities::AttendanceRecord,
    requests::{AttendanceRecordQuery, MarkAttendanceRequest},
};
use crate::models::users::entities::User;
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Arc<dyn Storage>,
}

impl AttendanceService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn get_storage(&self) -> Arc<dyn Storage> {
        self.storage.clone()
    }

    // 记录一次课的考勤，返回写入条数
    pub async fn mark(&self, actor: &User, req: MarkAttendanceRequest) -> Result<usize> {
        mark::mark_attendance(self, actor, req).await
    }

    // 查询课程考勤记录
    pub async fn records(
        &self,
        actor: &User,
        query: AttendanceRecordQuery,
    ) -> Result<Vec<AttendanceRecord>> {
        records::list_records(self, actor, query).await
    }
}
