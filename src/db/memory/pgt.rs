use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::whole_seconds;
use crate::{
    db::{error::DbResult, repos::PgtRepo},
    models::PgtRecord,
};

#[derive(Default)]
pub struct MemoryPgtRepo {
    records: RwLock<HashMap<String, PgtRecord>>,
}

impl MemoryPgtRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PgtRepo for MemoryPgtRepo {
    async fn insert(&self, mut record: PgtRecord) -> DbResult<()> {
        record.timestamp = whole_seconds(record.timestamp);
        let mut records = self.records.write().await;
        records.insert(record.ticket.clone(), record);
        Ok(())
    }

    async fn take(&self, ticket: &str) -> DbResult<Option<PgtRecord>> {
        let mut records = self.records.write().await;
        Ok(records.remove(ticket))
    }

    async fn count(&self) -> DbResult<u64> {
        Ok(self.records.read().await.len() as u64)
    }

    async fn delete_stored_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.timestamp > cutoff);
        Ok((before - records.len()) as u64)
    }
}
