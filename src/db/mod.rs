//! Storage for the CAS bridge: PGTs, login data, username associations and
//! the auto-assigned roles removed at runtime.

mod error;
pub mod memory;
pub mod repos;
#[cfg(feature = "database-sqlite")]
pub mod sqlite;

#[cfg(test)]
pub mod tests;

use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use repos::*;

use crate::config::DatabaseConfig;

/// Cached repository trait objects, created once at construction.
struct CachedRepos {
    pgts: Arc<dyn PgtRepo>,
    login_data: Arc<dyn LoginDataRepo>,
    cas_users: Arc<dyn CasUserRepo>,
    removed_roles: Arc<dyn RemovedRoleRepo>,
}

enum PoolStorage {
    Memory,
    #[cfg(feature = "database-sqlite")]
    Sqlite(sqlx::SqlitePool),
}

/// Database pool over either the in-memory or the SQLite backend.
///
/// Repositories are cached at construction time to avoid allocation on each access.
pub struct DbPool {
    inner: PoolStorage,
    repos: CachedRepos,
}

impl DbPool {
    /// Create a pool backed by in-process maps.
    pub fn in_memory() -> Self {
        let repos = CachedRepos {
            pgts: Arc::new(memory::MemoryPgtRepo::new()),
            login_data: Arc::new(memory::MemoryLoginDataRepo::new()),
            cas_users: Arc::new(memory::MemoryCasUserRepo::new()),
            removed_roles: Arc::new(memory::MemoryRemovedRoleRepo::new()),
        };
        DbPool {
            inner: PoolStorage::Memory,
            repos,
        }
    }

    /// Create a DbPool from an existing SQLite pool.
    /// Primarily useful for testing.
    #[cfg(feature = "database-sqlite")]
    pub fn from_sqlite(pool: sqlx::SqlitePool) -> Self {
        let repos = CachedRepos {
            pgts: Arc::new(sqlite::SqlitePgtRepo::new(pool.clone())),
            login_data: Arc::new(sqlite::SqliteLoginDataRepo::new(pool.clone())),
            cas_users: Arc::new(sqlite::SqliteCasUserRepo::new(pool.clone())),
            removed_roles: Arc::new(sqlite::SqliteRemovedRoleRepo::new(pool.clone())),
        };
        DbPool {
            inner: PoolStorage::Sqlite(pool),
            repos,
        }
    }

    /// Connect to the configured backend. Migrations are run when the
    /// backend asks for them.
    pub async fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        match config {
            DatabaseConfig::Memory => Ok(Self::in_memory()),
            #[cfg(feature = "database-sqlite")]
            DatabaseConfig::Sqlite(cfg) => {
                let pool = sqlx::sqlite::SqlitePoolOptions::new()
                    .max_connections(cfg.max_connections)
                    .connect_with(
                        sqlx::sqlite::SqliteConnectOptions::new()
                            .filename(&cfg.path)
                            .create_if_missing(cfg.create_if_missing)
                            .journal_mode(if cfg.wal_mode {
                                sqlx::sqlite::SqliteJournalMode::Wal
                            } else {
                                sqlx::sqlite::SqliteJournalMode::Delete
                            })
                            .busy_timeout(std::time::Duration::from_millis(cfg.busy_timeout_ms)),
                    )
                    .await?;

                let db = Self::from_sqlite(pool);
                if cfg.run_migrations {
                    db.run_migrations().await?;
                }
                Ok(db)
            }
        }
    }

    /// Run database migrations. A no-op for the memory backend.
    pub async fn run_migrations(&self) -> DbResult<()> {
        match &self.inner {
            PoolStorage::Memory => Ok(()),
            #[cfg(feature = "database-sqlite")]
            PoolStorage::Sqlite(pool) => {
                tracing::info!("Running SQLite migrations");
                sqlx::migrate!("./migrations_sqlx/sqlite").run(pool).await?;
                tracing::info!("SQLite migrations completed successfully");
                Ok(())
            }
        }
    }

    /// Short backend name for logs.
    pub fn backend_name(&self) -> &'static str {
        match &self.inner {
            PoolStorage::Memory => "memory",
            #[cfg(feature = "database-sqlite")]
            PoolStorage::Sqlite(_) => "sqlite",
        }
    }

    /// Get PGT repository
    pub fn pgts(&self) -> Arc<dyn PgtRepo> {
        Arc::clone(&self.repos.pgts)
    }

    /// Get login-data repository
    pub fn login_data(&self) -> Arc<dyn LoginDataRepo> {
        Arc::clone(&self.repos.login_data)
    }

    /// Get CAS username association repository
    pub fn cas_users(&self) -> Arc<dyn CasUserRepo> {
        Arc::clone(&self.repos.cas_users)
    }

    /// Get removed auto-assigned role repository
    pub fn removed_roles(&self) -> Arc<dyn RemovedRoleRepo> {
        Arc::clone(&self.repos.removed_roles)
    }
}
