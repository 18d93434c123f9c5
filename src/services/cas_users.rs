use std::sync::Arc;

use crate::{
    db::{DbError, DbPool, DbResult},
    models::{AccountId, CasUserMapping},
};

/// Maps local accounts to CAS usernames.
///
/// This is the only way the rest of the crate mutates associations.
#[derive(Clone)]
pub struct CasUserManager {
    db: Arc<DbPool>,
}

impl CasUserManager {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// CAS username associated with an account, if any.
    pub async fn lookup_username(&self, account_id: AccountId) -> DbResult<Option<String>> {
        Ok(self
            .db
            .cas_users()
            .get_by_account(account_id)
            .await?
            .map(|m| m.username))
    }

    /// Account associated with a CAS username, if any.
    pub async fn lookup_account(&self, username: &str) -> DbResult<Option<AccountId>> {
        Ok(self
            .db
            .cas_users()
            .get_by_username(username)
            .await?
            .map(|m| m.account_id))
    }

    /// Whether the account has a CAS association.
    pub async fn is_cas_user(&self, account_id: AccountId) -> DbResult<bool> {
        Ok(self.lookup_username(account_id).await?.is_some())
    }

    /// Associate `username` with `account_id`, replacing any previous
    /// username for that account.
    ///
    /// Fails with [`DbError::Conflict`] if the username belongs to a different
    /// account; neither association is changed in that case.
    pub async fn set(&self, account_id: AccountId, username: &str) -> DbResult<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DbError::Validation("CAS username cannot be empty".into()));
        }

        if let Some(owner) = self.lookup_account(username).await?
            && owner != account_id
        {
            return Err(DbError::Conflict(format!(
                "CAS username '{}' is already assigned to account {}",
                username, owner
            )));
        }

        self.db
            .cas_users()
            .upsert(CasUserMapping {
                account_id,
                username: username.to_string(),
            })
            .await?;

        tracing::debug!(account_id = %account_id, username, "CAS username associated");
        Ok(())
    }

    /// Remove the association for an account. Does nothing if there is none.
    pub async fn remove(&self, account_id: AccountId) -> DbResult<()> {
        if self.db.cas_users().delete(account_id).await? {
            tracing::debug!(account_id = %account_id, "CAS username association removed");
        }
        Ok(())
    }
}
