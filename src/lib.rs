//! CAS single sign-on integration hooks for a host application.
//!
//! - [`retention`]: periodic sweep of stale PGT and login-data records
//! - [`services::CasUserManager`]: local account to CAS username associations
//! - [`hooks`]: typed handlers for the host's form, session and role events
//!
//! Storage lives in [`db`], either in memory or in SQLite.

pub mod config;
pub mod db;
pub mod hooks;
pub mod models;
pub mod observability;
pub mod retention;
pub mod services;
