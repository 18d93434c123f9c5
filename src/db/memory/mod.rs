//! In-memory repositories.
//!
//! Suitable for development, tests and single-node deployments.
//! Data is lost on restart and not shared across nodes.

mod cas_users;
mod login_data;
mod pgt;
mod removed_roles;

pub use cas_users::MemoryCasUserRepo;
pub use login_data::MemoryLoginDataRepo;
pub use pgt::MemoryPgtRepo;
pub use removed_roles::MemoryRemovedRoleRepo;

use chrono::{DateTime, Utc};

/// Drop sub-second precision, matching the unix-seconds columns of the
/// SQLite backend so both backends agree at a sweep cutoff.
fn whole_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(ts.timestamp(), 0).unwrap_or(ts)
}
