//! Shared repository test infrastructure
//!
//! The same test logic runs against every backend. Each repository has a
//! module containing shared test functions that take `&dyn XxxRepo`, plus a
//! `memory_tests` and a `sqlite_tests` submodule that instantiate them.
//! SQLite tests use in-memory databases with the real migrations.

mod pgt;
