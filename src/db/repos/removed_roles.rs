use async_trait::async_trait;

use crate::{db::error::DbResult, models::RoleId};

/// Roles dropped from the auto-assigned list because the host deleted them.
///
/// This is the only runtime change to settings; every other setting comes
/// from the configuration file on each start.
#[async_trait]
pub trait RemovedRoleRepo: Send + Sync {
    /// Removed roles in the order they were recorded.
    async fn list(&self) -> DbResult<Vec<RoleId>>;

    /// Record a removed role. Returns false if it was already recorded.
    async fn record(&self, role: &RoleId) -> DbResult<bool>;
}
