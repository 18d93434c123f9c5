use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    db::{error::DbResult, repos::RemovedRoleRepo},
    models::RoleId,
};

#[derive(Default)]
pub struct MemoryRemovedRoleRepo {
    roles: RwLock<Vec<RoleId>>,
}

impl MemoryRemovedRoleRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RemovedRoleRepo for MemoryRemovedRoleRepo {
    async fn list(&self) -> DbResult<Vec<RoleId>> {
        Ok(self.roles.read().await.clone())
    }

    async fn record(&self, role: &RoleId) -> DbResult<bool> {
        let mut roles = self.roles.write().await;
        if roles.contains(role) {
            return Ok(false);
        }
        roles.push(role.clone());
        Ok(true)
    }
}
