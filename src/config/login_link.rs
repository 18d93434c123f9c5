use serde::{Deserialize, Serialize};

/// Link to the CAS entry point shown on the local login form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginLinkConfig {
    /// Whether to add the link to the login form.
    #[serde(default)]
    pub enabled: bool,

    /// Link text.
    #[serde(default = "default_label")]
    pub label: String,

    /// Path of the CAS login entry point.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for LoginLinkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            label: default_label(),
            path: default_path(),
        }
    }
}

fn default_label() -> String {
    "CAS Login".to_string()
}

pub(crate) fn default_path() -> String {
    "/caslogin".to_string()
}
