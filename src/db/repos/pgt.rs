use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{db::error::DbResult, models::PgtRecord};

/// Storage for Proxy Granting Tickets.
#[async_trait]
pub trait PgtRepo: Send + Sync {
    /// Store a PGT, replacing any record with the same ticket.
    async fn insert(&self, record: PgtRecord) -> DbResult<()>;

    /// Get and remove the PGT for a ticket.
    async fn take(&self, ticket: &str) -> DbResult<Option<PgtRecord>>;

    /// Count stored tickets.
    async fn count(&self) -> DbResult<u64>;

    /// Delete every record with `timestamp <= cutoff`, returning how many went.
    async fn delete_stored_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64>;
}
