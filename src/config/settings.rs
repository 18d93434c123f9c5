use serde::{Deserialize, Serialize};

use super::{CasConfig, login_link::default_path};
use crate::models::RoleId;

/// The settings the hooks and the sweeper read, as one immutable snapshot.
///
/// Built from [`CasConfig`] on every start. Roles deleted at runtime are
/// removed again by `SettingsHandle::load`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasSettings {
    /// `logout.single_logout_session_lifetime`, in days
    pub single_logout_session_lifetime: i64,
    /// `user_accounts.auto_assigned_roles`
    pub auto_assigned_roles: Vec<RoleId>,
    /// `user_accounts.restrict_password_management`
    pub restrict_password_management: bool,
    /// `user_accounts.restrict_email_management`
    pub restrict_email_management: bool,
    /// `user_accounts.prevent_normal_login`
    pub prevent_normal_login: bool,
    /// `login_link_enabled`
    pub login_link_enabled: bool,
    /// `login_link_label`
    pub login_link_label: String,
    /// Path of the CAS login entry point
    #[serde(default = "default_path")]
    pub login_path: String,
}

impl Default for CasSettings {
    fn default() -> Self {
        CasConfig::default().settings()
    }
}

impl CasConfig {
    /// Snapshot the hook and sweep settings out of the full configuration.
    pub fn settings(&self) -> CasSettings {
        CasSettings {
            single_logout_session_lifetime: self.logout.single_logout_session_lifetime,
            auto_assigned_roles: self.user_accounts.auto_assigned_roles.clone(),
            restrict_password_management: self.user_accounts.restrict_password_management,
            restrict_email_management: self.user_accounts.restrict_email_management,
            prevent_normal_login: self.user_accounts.prevent_normal_login,
            login_link_enabled: self.login_link.enabled,
            login_link_label: self.login_link.label.clone(),
            login_path: self.login_link.path.clone(),
        }
    }
}
