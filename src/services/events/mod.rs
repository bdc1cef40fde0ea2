use std::sync::Arc;

use crate::errors::Result;
use crate::models::events::entities::Event;
use crate::storage::Storage;

const UPCOMING_LIMIT: u64 = 10;

pub struct EventService {
    storage: Arc<dyn Storage>,
}

impl EventService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    // 最近的校园活动
    pub async fn upcoming(&self) -> Result<Vec<Event>> {
        self.storage.list_upcoming_events(UPCOMING_LIMIT).await
    }
}
