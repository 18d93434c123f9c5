use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::whole_seconds;
use crate::{
    db::{error::DbResult, repos::LoginDataRepo},
    models::{LoginData, SessionId},
};

#[derive(Default)]
pub struct MemoryLoginDataRepo {
    records: RwLock<HashMap<SessionId, LoginData>>,
}

impl MemoryLoginDataRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoginDataRepo for MemoryLoginDataRepo {
    async fn insert(&self, mut record: LoginData) -> DbResult<()> {
        record.created = whole_seconds(record.created);
        let mut records = self.records.write().await;
        records.insert(record.session_id.clone(), record);
        Ok(())
    }

    async fn get(&self, session_id: &SessionId) -> DbResult<Option<LoginData>> {
        Ok(self.records.read().await.get(session_id).cloned())
    }

    async fn get_by_ticket(&self, ticket: &str) -> DbResult<Option<LoginData>> {
        let records = self.records.read().await;
        Ok(records.values().find(|r| r.ticket == ticket).cloned())
    }

    async fn count(&self) -> DbResult<u64> {
        Ok(self.records.read().await.len() as u64)
    }

    async fn delete(&self, session_id: &SessionId) -> DbResult<bool> {
        let mut records = self.records.write().await;
        Ok(records.remove(session_id).is_some())
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.created > cutoff);
        Ok((before - records.len()) as u64)
    }
}
