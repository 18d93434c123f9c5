//! Sweep worker for stale PGT and login-data records.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::{
    config::{CasSettings, SweepConfig},
    db::{DbPool, DbResult},
    observability::metrics,
    services::SettingsHandle,
};

/// Age after which a stored PGT is swept, in seconds.
pub const PGT_TTL_SECS: i64 = 3600;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Maximum ages applied by one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPolicy {
    pub pgt_ttl_secs: i64,
    /// Zero or negative disables the login-data sweep.
    pub login_data_ttl_days: i64,
}

impl SweepPolicy {
    pub fn from_settings(settings: &CasSettings) -> Self {
        Self {
            pgt_ttl_secs: PGT_TTL_SECS,
            login_data_ttl_days: settings.single_logout_session_lifetime,
        }
    }

    /// Login-data lifetime in seconds, or `None` when that sweep is disabled.
    pub fn login_data_ttl_secs(&self) -> Option<i64> {
        let secs = self.login_data_ttl_days.saturating_mul(SECONDS_PER_DAY);
        (secs > 0).then_some(secs)
    }
}

/// Results from a single sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepResult {
    /// Number of PGT records deleted.
    pub pgts_deleted: u64,
    /// Number of login-data records deleted.
    pub login_data_deleted: u64,
    /// True when the login-data store was left alone because its lifetime is <= 0.
    pub login_data_skipped: bool,
}

impl SweepResult {
    pub fn total(&self) -> u64 {
        self.pgts_deleted + self.login_data_deleted
    }

    pub fn has_deletions(&self) -> bool {
        self.total() > 0
    }
}

/// Run a single sweep at `now`.
///
/// PGTs with `timestamp <= now - pgt_ttl_secs` are deleted; login data with
/// `created <= now - login_data_ttl_days * 86400` is deleted when that
/// lifetime is positive.
pub async fn run_sweep(
    db: &DbPool,
    now: DateTime<Utc>,
    policy: &SweepPolicy,
) -> DbResult<SweepResult> {
    let mut result = SweepResult::default();

    if let Some(cutoff) = cutoff(now, policy.pgt_ttl_secs) {
        result.pgts_deleted = db.pgts().delete_stored_before(cutoff).await?;
        if result.pgts_deleted > 0 {
            tracing::debug!(
                deleted = result.pgts_deleted,
                cutoff = %cutoff,
                "Deleted stale PGT records"
            );
            metrics::record_sweep_deletion("pgt", result.pgts_deleted);
        }
    }

    match policy.login_data_ttl_secs() {
        Some(ttl_secs) => {
            let Some(cutoff) = cutoff(now, ttl_secs) else {
                return Ok(result);
            };
            result.login_data_deleted = db.login_data().delete_created_before(cutoff).await?;
            if result.login_data_deleted > 0 {
                tracing::debug!(
                    deleted = result.login_data_deleted,
                    cutoff = %cutoff,
                    "Deleted stale login data"
                );
                metrics::record_sweep_deletion("login_data", result.login_data_deleted);
            }
        }
        None => {
            result.login_data_skipped = true;
        }
    }

    Ok(result)
}

/// `now - ttl_secs`, or `None` when that lies outside the representable range
/// (nothing can be that old).
fn cutoff(now: DateTime<Utc>, ttl_secs: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(ttl_secs).and_then(|ttl| now.checked_sub_signed(ttl))
}

/// Starts the sweep worker as a background task.
///
/// The settings snapshot is re-read before every run, so a lifetime change
/// takes effect on the next cycle. Runs until the task is cancelled.
pub async fn start_sweep_worker(
    db: Arc<DbPool>,
    settings: Arc<SettingsHandle>,
    config: SweepConfig,
) {
    if !config.enabled {
        tracing::info!("Sweep worker disabled by configuration");
        return;
    }

    tracing::info!(
        interval_secs = config.interval_secs,
        pgt_ttl_secs = PGT_TTL_SECS,
        "Starting sweep worker"
    );

    let mut interval = tokio::time::interval(config.interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let policy = SweepPolicy::from_settings(&*settings.snapshot().await);
        match run_sweep(&db, Utc::now(), &policy).await {
            Ok(result) => {
                if result.has_deletions() {
                    tracing::info!(
                        pgts = result.pgts_deleted,
                        login_data = result.login_data_deleted,
                        login_data_skipped = result.login_data_skipped,
                        "Sweep complete"
                    );
                } else {
                    tracing::debug!(
                        login_data_skipped = result.login_data_skipped,
                        "Sweep complete, no records to delete"
                    );
                }
            }
            Err(e) => {
                metrics::record_sweep_failure();
                tracing::error!(error = %e, "Error running sweep");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::models::{LoginData, PgtRecord, SessionId};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    async fn add_pgt(db: &DbPool, ticket: &str, timestamp: i64) {
        db.pgts()
            .insert(PgtRecord {
                ticket: ticket.to_string(),
                pgt: format!("PGT-{ticket}"),
                timestamp: at(timestamp),
            })
            .await
            .unwrap();
    }

    async fn add_login(db: &DbPool, session: &str, created: i64) {
        db.login_data()
            .insert(LoginData {
                session_id: SessionId::from(session),
                ticket: format!("ST-{session}"),
                created: at(created),
            })
            .await
            .unwrap();
    }

    fn policy(login_data_ttl_days: i64) -> SweepPolicy {
        SweepPolicy {
            pgt_ttl_secs: PGT_TTL_SECS,
            login_data_ttl_days,
        }
    }

    #[tokio::test]
    async fn test_pgt_older_than_an_hour_is_swept() {
        let db = DbPool::in_memory();
        add_pgt(&db, "old", 6000).await;
        add_pgt(&db, "fresh", 9500).await;

        let result = run_sweep(&db, at(10_000), &policy(1)).await.unwrap();

        assert_eq!(result.pgts_deleted, 1);
        assert!(db.pgts().take("old").await.unwrap().is_none());
        assert!(db.pgts().take("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_pgt_exactly_at_cutoff_is_swept() {
        let db = DbPool::in_memory();
        add_pgt(&db, "edge", 10_000 - PGT_TTL_SECS).await;
        add_pgt(&db, "inside", 10_000 - PGT_TTL_SECS + 1).await;

        let result = run_sweep(&db, at(10_000), &policy(1)).await.unwrap();

        assert_eq!(result.pgts_deleted, 1);
        assert!(db.pgts().take("inside").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_login_data_older_than_lifetime_is_swept() {
        let db = DbPool::in_memory();
        add_login(&db, "old", 100_000).await;
        add_login(&db, "fresh", 150_000).await;

        let result = run_sweep(&db, at(200_000), &policy(1)).await.unwrap();

        assert_eq!(result.login_data_deleted, 1);
        assert!(!result.login_data_skipped);
        assert!(db.login_data().get(&SessionId::from("old")).await.unwrap().is_none());
        assert!(db.login_data().get(&SessionId::from("fresh")).await.unwrap().is_some());
    }

    #[rstest]
    #[case::zero(0)]
    #[case::negative(-3)]
    #[tokio::test]
    async fn test_non_positive_lifetime_keeps_login_data(#[case] days: i64) {
        let db = DbPool::in_memory();
        add_login(&db, "ancient", 0).await;
        add_login(&db, "recent", 199_999).await;
        add_pgt(&db, "old", 0).await;

        let result = run_sweep(&db, at(10_000_000), &policy(days)).await.unwrap();

        assert!(result.login_data_skipped);
        assert_eq!(result.login_data_deleted, 0);
        assert_eq!(db.login_data().count().await.unwrap(), 2);
        // The PGT sweep still runs
        assert_eq!(result.pgts_deleted, 1);
    }

    #[tokio::test]
    async fn test_sweep_on_empty_stores() {
        let db = DbPool::in_memory();
        let result = run_sweep(&db, at(10_000), &policy(25)).await.unwrap();
        assert_eq!(result, SweepResult::default());
        assert!(!result.has_deletions());
    }

    #[test]
    fn test_policy_from_settings() {
        let settings = CasSettings {
            single_logout_session_lifetime: 2,
            ..CasSettings::default()
        };
        let policy = SweepPolicy::from_settings(&settings);
        assert_eq!(policy.pgt_ttl_secs, 3600);
        assert_eq!(policy.login_data_ttl_secs(), Some(2 * SECONDS_PER_DAY));
        assert_eq!(self::policy(0).login_data_ttl_secs(), None);
        assert_eq!(self::policy(i64::MIN).login_data_ttl_secs(), None);
    }

    #[tokio::test]
    async fn test_huge_lifetime_deletes_nothing() {
        let db = DbPool::in_memory();
        add_login(&db, "ancient", 0).await;

        let result = run_sweep(&db, at(200_000), &policy(i64::MAX)).await.unwrap();

        assert!(!result.login_data_skipped);
        assert_eq!(result.login_data_deleted, 0);
        assert_eq!(db.login_data().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_restart_with_disabled_lifetime_stops_login_data_sweep() {
        let db = Arc::new(DbPool::in_memory());
        SettingsHandle::load(db.clone(), CasSettings::default())
            .await
            .unwrap();
        add_login(&db, "ancient", 0).await;

        let edited = CasSettings {
            single_logout_session_lifetime: 0,
            ..CasSettings::default()
        };
        let handle = SettingsHandle::load(db.clone(), edited).await.unwrap();
        let policy = SweepPolicy::from_settings(&*handle.snapshot().await);
        let result = run_sweep(&db, at(10_000_000), &policy).await.unwrap();

        assert!(result.login_data_skipped);
        assert_eq!(db.login_data().count().await.unwrap(), 1);
    }

    #[test]
    fn test_sweep_result_total() {
        let result = SweepResult {
            pgts_deleted: 3,
            login_data_deleted: 4,
            login_data_skipped: false,
        };
        assert_eq!(result.total(), 7);
        assert!(result.has_deletions());
    }

    #[cfg(feature = "database-sqlite")]
    #[tokio::test]
    async fn test_sweep_against_sqlite() {
        let pool = crate::db::tests::harness::create_migrated_sqlite_pool().await;
        let db = DbPool::from_sqlite(pool);
        add_pgt(&db, "old", 6000).await;
        add_pgt(&db, "fresh", 9500).await;
        add_login(&db, "old", 100_000).await;
        add_login(&db, "fresh", 150_000).await;

        let result = run_sweep(&db, at(200_000), &policy(1)).await.unwrap();

        // At now=200000 both PGTs are older than an hour
        assert_eq!(result.pgts_deleted, 2);
        assert_eq!(result.login_data_deleted, 1);
        assert_eq!(db.login_data().count().await.unwrap(), 1);
    }
}
