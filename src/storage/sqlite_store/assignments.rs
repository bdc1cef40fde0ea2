//! 作业存储操作

use sea_orm::{
    ActiveValue::Set, ColumnTrait, DbBackend, EntityTrait, QueryFilter, QueryOrder, QueryTrait,
};

use super::Store;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments, Model};
use crate::errors::{CampusError, Result};
use crate::models::assignments::{entities::Assignment, requests::CreateAssignmentRequest};

impl Store {
    /// 创建作业
    pub async fn create_assignment_impl(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        let stmt = Assignments::insert(ActiveModel {
            course_id: Set(req.course_id),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date),
            ..Default::default()
        })
        .build(DbBackend::Sqlite);

        let id = self.mutate(stmt).await?.last_insert_id() as i64;

        self.get_assignment_by_id_impl(id)
            .await?
            .ok_or_else(|| CampusError::database_operation(format!("新建作业 {id} 读取失败")))
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let model: Option<Model> = self
            .query_one(Assignments::find_by_id(id).build(DbBackend::Sqlite))
            .await?;
        Ok(model.map(|m| m.into_assignment()))
    }

    /// 列出作业（可按课程筛选），按截止日期排序
    pub async fn list_assignments_impl(&self, course_id: Option<i64>) -> Result<Vec<Assignment>> {
        let mut select = Assignments::find();

        if let Some(course_id) = course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        let stmt = select
            .order_by_asc(Column::DueDate)
            .order_by_asc(Column::Id)
            .build(DbBackend::Sqlite);
        let models: Vec<Model> = self.query_many(stmt).await?;
        Ok(models.into_iter().map(|m| m.into_assignment()).collect())
    }
}
