use std::sync::Arc;

use crate::{
    config::CasSettings,
    db::DbPool,
    services::{AccountDirectory, CasUserManager, SettingsHandle},
};

/// Everything a handler may touch during one dispatch.
///
/// `settings` is a snapshot taken when the context was built; handlers never
/// read configuration from anywhere else.
#[derive(Clone)]
pub struct HookContext {
    pub db: Arc<DbPool>,
    pub settings: Arc<CasSettings>,
    pub settings_handle: Arc<SettingsHandle>,
    pub accounts: Arc<dyn AccountDirectory>,
}

impl HookContext {
    /// Build a context around the current settings snapshot.
    pub async fn new(
        db: Arc<DbPool>,
        settings_handle: Arc<SettingsHandle>,
        accounts: Arc<dyn AccountDirectory>,
    ) -> Self {
        let settings = settings_handle.snapshot().await;
        Self {
            db,
            settings,
            settings_handle,
            accounts,
        }
    }

    pub fn cas_users(&self) -> CasUserManager {
        CasUserManager::new(self.db.clone())
    }
}
