//! Retention sweep scheduling.
//!
//! # Example
//!
//! ```toml
//! [sweep]
//! enabled = true
//! interval_secs = 3600
//! ```

use serde::{Deserialize, Serialize};

/// Scheduling for the periodic PGT / login-data sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    /// Whether the background sweep runs.
    /// Default: true
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Seconds between sweeps.
    /// Default: 3600 (hourly)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    3600
}

impl SweepConfig {
    /// Get the interval as a Duration.
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_secs)
    }
}
