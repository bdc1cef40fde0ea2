//! 用户存储操作

use sea_orm::{ActiveValue::Set, ColumnTrait, DbBackend, EntityTrait, QueryFilter, QueryTrait};

use super::Store;
use crate::entity::users::{ActiveModel, Column, Entity as Users, Model};
use crate::errors::{CampusError, Result};
use crate::models::users::{entities::User, requests::CreateUserRequest};

#[derive(sea_orm::FromQueryResult)]
struct UserCount {
    count: i64,
}

impl Store {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let stmt = Users::insert(ActiveModel {
            email: Set(req.email),
            password: Set(req.password),
            name: Set(req.name),
            role: Set(req.role.to_string()),
            ..Default::default()
        })
        .build(DbBackend::Sqlite);

        let result = self.mutate(stmt).await?;
        let id = result.last_insert_id() as i64;

        self.get_user_by_id_impl(id)
            .await?
            .ok_or_else(|| CampusError::database_operation(format!("新建用户 {id} 读取失败")))
    }

    /// 用户总数
    pub async fn count_users_impl(&self) -> Result<i64> {
        let row: Option<UserCount> = self
            .query_one(Store::statement(
                "SELECT COUNT(*) AS count FROM users",
                [],
            ))
            .await?;
        Ok(row.map(|r| r.count).unwrap_or(0))
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let stmt = Users::find_by_id(id).build(DbBackend::Sqlite);
        let model: Option<Model> = self.query_one(stmt).await?;
        Ok(model.map(|m| m.into_user()))
    }

    /// 通过邮箱和密码获取用户
    pub async fn get_user_by_credentials_impl(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>> {
        let stmt = Users::find()
            .filter(Column::Email.eq(email))
            .filter(Column::Password.eq(password))
            .build(DbBackend::Sqlite);
        let model: Option<Model> = self.query_one(stmt).await?;
        Ok(model.map(|m| m.into_user()))
    }
}
