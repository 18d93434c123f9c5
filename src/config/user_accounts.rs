use serde::{Deserialize, Serialize};

use crate::models::RoleId;

/// Policies for accounts that are associated with a CAS username.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAccountsConfig {
    /// Roles granted to accounts created through CAS login, in order.
    #[serde(default)]
    pub auto_assigned_roles: Vec<RoleId>,

    /// Hide password fields and block password resets for CAS accounts.
    #[serde(default)]
    pub restrict_password_management: bool,

    /// Disable the email field on the account edit form.
    #[serde(default)]
    pub restrict_email_management: bool,

    /// Reject local username/password login for CAS accounts.
    #[serde(default)]
    pub prevent_normal_login: bool,
}
