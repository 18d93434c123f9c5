use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    db::error::DbResult,
    models::{LoginData, SessionId},
};

/// Storage for single-logout session correlation.
#[async_trait]
pub trait LoginDataRepo: Send + Sync {
    /// Record a CAS login, replacing any record for the same session.
    async fn insert(&self, record: LoginData) -> DbResult<()>;

    async fn get(&self, session_id: &SessionId) -> DbResult<Option<LoginData>>;

    /// Find the session created by a service ticket.
    async fn get_by_ticket(&self, ticket: &str) -> DbResult<Option<LoginData>>;

    async fn count(&self) -> DbResult<u64>;

    /// Delete the record for one session. Returns whether a record existed.
    async fn delete(&self, session_id: &SessionId) -> DbResult<bool>;

    /// Delete every record with `created <= cutoff`, returning how many went.
    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64>;
}
