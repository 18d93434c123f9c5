use async_trait::async_trait;

use crate::{
    db::error::DbResult,
    models::{AccountId, CasUserMapping},
};

/// Storage for account ↔ CAS username associations.
///
/// Implementations enforce that a username belongs to at most one account
/// and return `DbError::Conflict` otherwise.
#[async_trait]
pub trait CasUserRepo: Send + Sync {
    async fn get_by_account(&self, account_id: AccountId) -> DbResult<Option<CasUserMapping>>;
    async fn get_by_username(&self, username: &str) -> DbResult<Option<CasUserMapping>>;

    /// Insert or replace the username for an account.
    async fn upsert(&self, mapping: CasUserMapping) -> DbResult<()>;

    /// Remove the association for an account. Returns whether one existed.
    async fn delete(&self, account_id: AccountId) -> DbResult<bool>;

    async fn count(&self) -> DbResult<u64>;
}
