use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored Proxy Granting Ticket.
///
/// Written by the CAS client when the server calls back with a PGT during
/// proxy validation; read back once when a proxy ticket is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgtRecord {
    /// PGT IOU / ticket identifier issued by the CAS server
    pub ticket: String,
    /// Proxy granting ticket value
    pub pgt: String,
    /// When the ticket was stored
    pub timestamp: DateTime<Utc>,
}
