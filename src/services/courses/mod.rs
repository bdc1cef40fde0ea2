use std::sync::Arc;

use crate::errors::{CampusError, Result};
use crate::models::courses::entities::{Course, RosterStudent};
use crate::storage::Storage;

pub struct CourseService {
    storage: Arc<dyn Storage>,
}

impl CourseService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 全部课程，按课程代码排序
    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        self.storage.list_courses().await
    }

    /// 课程的学生名单
    pub async fn list_students(&self, course_id: Option<i64>) -> Result<Vec<RosterStudent>> {
        let course_id = course_id.ok_or_else(|| CampusError::validation("courseId required"))?;
        self.storage.list_course_students(course_id).await
    }
}
