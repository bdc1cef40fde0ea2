//! 课程与选课存储操作

use sea_orm::{
    ActiveValue::Set, ColumnTrait, DbBackend, EntityTrait, QueryFilter, QueryOrder, QueryTrait,
};

use super::Store;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses, Model};
use crate::entity::enrollments::{
    Column as EnrollmentColumn, Entity as Enrollments, Model as EnrollmentModel,
};
use crate::errors::{CampusError, Result};
use crate::models::courses::entities::{Course, RosterStudent};
use crate::models::users::entities::UserRole;

#[derive(sea_orm::FromQueryResult)]
struct RosterRow {
    id: i64,
    name: String,
    email: String,
}

impl Store {
    /// 创建课程
    pub async fn create_course_impl(&self, name: &str, code: &str) -> Result<Course> {
        let stmt = Courses::insert(ActiveModel {
            name: Set(name.to_string()),
            code: Set(code.to_string()),
            ..Default::default()
        })
        .build(DbBackend::Sqlite);

        let id = self.mutate(stmt).await?.last_insert_id() as i64;

        let model: Option<Model> = self
            .query_one(Courses::find_by_id(id).build(DbBackend::Sqlite))
            .await?;
        model
            .map(|m| m.into_course())
            .ok_or_else(|| CampusError::database_operation(format!("新建课程 {id} 读取失败")))
    }

    /// 按课程代码列出全部课程
    pub async fn list_courses_impl(&self) -> Result<Vec<Course>> {
        let stmt = Courses::find()
            .order_by_asc(Column::Code)
            .build(DbBackend::Sqlite);
        let models: Vec<Model> = self.query_many(stmt).await?;
        Ok(models.into_iter().map(|m| m.into_course()).collect())
    }

    /// 用户是否选了该课程
    pub async fn is_enrolled_impl(&self, user_id: i64, course_id: i64) -> Result<bool> {
        let stmt = Enrollments::find()
            .filter(EnrollmentColumn::UserId.eq(user_id))
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .build(DbBackend::Sqlite);
        let enrollment: Option<EnrollmentModel> = self.query_one(stmt).await?;
        Ok(enrollment.is_some())
    }

    /// 课程花名册（仅学生，按姓名排序）
    pub async fn list_course_students_impl(&self, course_id: i64) -> Result<Vec<RosterStudent>> {
        let rows: Vec<RosterRow> = self
            .query_many(Store::statement(
                "SELECT u.id, u.name, u.email FROM users u \
                 JOIN enrollments e ON e.user_id = u.id \
                 WHERE e.course_id = ? AND u.role = ? \
                 ORDER BY u.name",
                [course_id.into(), UserRole::STUDENT.into()],
            ))
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| RosterStudent {
                id: r.id,
                name: r.name,
                email: r.email,
            })
            .collect())
    }
}
