use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SessionId;

/// Correlates a local session with the CAS service ticket that created it.
///
/// Used for single logout: when the CAS server announces that a ticket was
/// logged out, the session holding it can be destroyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    pub session_id: SessionId,
    /// Service ticket that was validated for this login
    pub ticket: String,
    pub created: DateTime<Utc>,
}
