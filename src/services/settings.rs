use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::CasSettings,
    db::{DbPool, DbResult},
    models::RoleId,
};

/// Holds the current settings snapshot.
///
/// Settings come from the configuration on every start. The one runtime
/// change, dropping a deleted role from `auto_assigned_roles`, is recorded in
/// the store and reapplied on load.
///
/// Readers take an `Arc<CasSettings>` and keep it for the whole request, so a
/// concurrent change never alters settings under a running handler.
pub struct SettingsHandle {
    db: Arc<DbPool>,
    current: RwLock<Arc<CasSettings>>,
}

impl SettingsHandle {
    /// Build the snapshot from `configured`, minus any roles removed at runtime.
    pub async fn load(db: Arc<DbPool>, configured: CasSettings) -> DbResult<Self> {
        let removed = db.removed_roles().list().await?;

        let mut settings = configured;
        settings.auto_assigned_roles.retain(|role| {
            let keep = !removed.contains(role);
            if !keep {
                tracing::warn!(
                    role = %role,
                    "Configured auto-assigned role was deleted at runtime and is ignored"
                );
            }
            keep
        });

        Ok(Self {
            db,
            current: RwLock::new(Arc::new(settings)),
        })
    }

    /// The settings in force right now.
    pub async fn snapshot(&self) -> Arc<CasSettings> {
        Arc::clone(&*self.current.read().await)
    }

    /// Drop every occurrence of `role` from the auto-assigned roles.
    ///
    /// The removal is persisted before the snapshot changes, under one write
    /// lock. Returns false when the role was not auto-assigned.
    pub async fn remove_auto_assigned_role(&self, role: &RoleId) -> DbResult<bool> {
        let mut current = self.current.write().await;
        if !current.auto_assigned_roles.contains(role) {
            return Ok(false);
        }

        self.db.removed_roles().record(role).await?;

        let mut next = CasSettings::clone(&current);
        next.auto_assigned_roles.retain(|r| r != role);
        *current = Arc::new(next);
        Ok(true)
    }
}
