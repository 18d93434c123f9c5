use serde::{Deserialize, Serialize};

use super::AccountId;

/// Association between a local account and its CAS username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasUserMapping {
    pub account_id: AccountId,
    pub username: String,
}
