//! Metrics for the CAS bridge.
//!
//! Recorded through the `metrics` facade when the `prometheus` feature is
//! enabled; the host installs whichever recorder/exporter it uses. Without
//! the feature every function here is a no-op.

#[cfg(feature = "prometheus")]
use metrics::counter;

/// Record records deleted by the retention sweep.
///
/// # Arguments
/// * `store` - The store swept ("pgt" or "login_data")
/// * `count` - The number of records deleted
pub fn record_sweep_deletion(store: &str, count: u64) {
    #[cfg(feature = "prometheus")]
    {
        counter!(
            "cas_sweep_deletions_total",
            "store" => store.to_string()
        )
        .increment(count);
    }
    #[cfg(not(feature = "prometheus"))]
    {
        let _ = (store, count);
    }
}

/// Record a failed sweep run.
pub fn record_sweep_failure() {
    #[cfg(feature = "prometheus")]
    {
        counter!("cas_sweep_failures_total").increment(1);
    }
}

/// Record a form or login rejected by a CAS policy.
///
/// # Arguments
/// * `policy` - e.g. "prevent_normal_login", "restrict_password_management", "username_taken"
pub fn record_policy_rejection(policy: &'static str) {
    #[cfg(feature = "prometheus")]
    {
        counter!("cas_policy_rejections_total", "policy" => policy).increment(1);
    }
    #[cfg(not(feature = "prometheus"))]
    {
        let _ = policy;
    }
}
