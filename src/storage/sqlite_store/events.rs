//! 校园活动存储操作

use sea_orm::{DbBackend, EntityTrait, QueryOrder, QuerySelect, QueryTrait};

use super::Store;
use crate::entity::events::{Column, Entity as Events, Model};
use crate::errors::Result;
use crate::models::events::entities::Event;

impl Store {
    /// 按活动日期列出最近的活动
    pub async fn list_upcoming_events_impl(&self, limit: u64) -> Result<Vec<Event>> {
        let stmt = Events::find()
            .order_by_asc(Column::EventDate)
            .limit(limit)
            .build(DbBackend::Sqlite);
        let models: Vec<Model> = self.query_many(stmt).await?;
        Ok(models.into_iter().map(|m| m.into_event()).collect())
    }
}
