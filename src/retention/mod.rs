//! Retention sweep for CAS bookkeeping tables.
//!
//! A background worker periodically:
//! 1. Deletes Proxy Granting Tickets older than one hour
//! 2. Deletes single-logout login data older than the configured lifetime,
//!    unless that lifetime is zero or negative
//!
//! The two deletions are independent. Storage failures are returned to the
//! caller; the worker logs them and tries again on its next cycle.

mod worker;

pub use worker::{
    PGT_TTL_SECS, SECONDS_PER_DAY, SweepPolicy, SweepResult, run_sweep, start_sweep_worker,
};
