use serde::{Deserialize, Serialize};

/// Logout and single-logout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogoutConfig {
    /// Days to keep login-data records used to correlate single-logout
    /// requests with local sessions. Zero or negative keeps them until the
    /// session logs out.
    /// Default: 25
    #[serde(default = "default_single_logout_session_lifetime")]
    pub single_logout_session_lifetime: i64,
}

impl Default for LogoutConfig {
    fn default() -> Self {
        Self {
            single_logout_session_lifetime: default_single_logout_session_lifetime(),
        }
    }
}

fn default_single_logout_session_lifetime() -> i64 {
    25
}
