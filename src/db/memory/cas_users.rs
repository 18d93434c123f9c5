use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    db::{
        error::{DbError, DbResult},
        repos::CasUserRepo,
    },
    models::{AccountId, CasUserMapping},
};

#[derive(Default)]
struct Mappings {
    by_account: HashMap<AccountId, String>,
    by_username: HashMap<String, AccountId>,
}

/// Both directions live under one lock so they never disagree.
#[derive(Default)]
pub struct MemoryCasUserRepo {
    mappings: RwLock<Mappings>,
}

impl MemoryCasUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CasUserRepo for MemoryCasUserRepo {
    async fn get_by_account(&self, account_id: AccountId) -> DbResult<Option<CasUserMapping>> {
        let mappings = self.mappings.read().await;
        Ok(mappings
            .by_account
            .get(&account_id)
            .map(|username| CasUserMapping {
                account_id,
                username: username.clone(),
            }))
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<CasUserMapping>> {
        let mappings = self.mappings.read().await;
        Ok(mappings
            .by_username
            .get(username)
            .map(|account_id| CasUserMapping {
                account_id: *account_id,
                username: username.to_string(),
            }))
    }

    async fn upsert(&self, mapping: CasUserMapping) -> DbResult<()> {
        let mut mappings = self.mappings.write().await;

        if let Some(owner) = mappings.by_username.get(&mapping.username)
            && *owner != mapping.account_id
        {
            return Err(DbError::Conflict(format!(
                "CAS username '{}' is already assigned to account {}",
                mapping.username, owner
            )));
        }

        if let Some(previous) = mappings
            .by_account
            .insert(mapping.account_id, mapping.username.clone())
        {
            mappings.by_username.remove(&previous);
        }
        mappings
            .by_username
            .insert(mapping.username, mapping.account_id);
        Ok(())
    }

    async fn delete(&self, account_id: AccountId) -> DbResult<bool> {
        let mut mappings = self.mappings.write().await;
        match mappings.by_account.remove(&account_id) {
            Some(username) => {
                mappings.by_username.remove(&username);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> DbResult<u64> {
        Ok(self.mappings.read().await.by_account.len() as u64)
    }
}
