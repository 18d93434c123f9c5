use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{db::DbResult, models::AccountId};

/// Lookup of local accounts owned by the host application.
///
/// The password-reset policy needs to turn whatever the user typed into an
/// account; the host provides that lookup.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> DbResult<Option<AccountId>>;
    async fn find_by_name(&self, name: &str) -> DbResult<Option<AccountId>>;
}

/// In-memory [`AccountDirectory`] for tests and embedded use.
#[derive(Default)]
pub struct MemoryAccountDirectory {
    by_email: RwLock<HashMap<String, AccountId>>,
    by_name: RwLock<HashMap<String, AccountId>>,
}

impl MemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, account_id: AccountId, name: &str, email: Option<&str>) {
        self.by_name
            .write()
            .await
            .insert(name.to_lowercase(), account_id);
        if let Some(email) = email {
            self.by_email
                .write()
                .await
                .insert(email.to_lowercase(), account_id);
        }
    }
}

#[async_trait]
impl AccountDirectory for MemoryAccountDirectory {
    async fn find_by_email(&self, email: &str) -> DbResult<Option<AccountId>> {
        Ok(self
            .by_email
            .read()
            .await
            .get(&email.to_lowercase())
            .copied())
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Option<AccountId>> {
        Ok(self.by_name.read().await.get(&name.to_lowercase()).copied())
    }
}
