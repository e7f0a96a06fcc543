//! Window monitoring.
//!
//! # Data Flow
//! ```text
//! Outcome reported:
//!     record(kind)
//!     → bucket = now / 60 (floor)
//!     → store.increment("service:bucket:kind")
//!
//! Admission check:
//!     stats_for_previous_period()
//!     → bucket = now / 60 - 1 (the last completed window)
//!     → store.get(...) for each kind, absent reads as zero
//!     → BucketStats
//! ```
//!
//! # Design Decisions
//! - Fixed 60-second buckets; bucket `b` covers `[b*60, (b+1)*60)`
//! - Floor division toward negative infinity, so bucket 0 covers `[0, 60)`
//!   even for inputs at or below zero
//! - Decisions read the previous bucket only; the live bucket is still
//!   accumulating and would bias itself
//! - Rejections are recorded but excluded from the request total: they
//!   describe gate behavior, not dependency health

use std::fmt;
use std::sync::Arc;

use crate::observability::metrics;
use crate::store::{CounterStore, StoreResult};
use crate::time::TimeSource;

/// Length of one statistics window in seconds.
pub const SAMPLE_PERIOD_SECS: i64 = 60;

/// Index of the bucket containing `time`.
pub fn bucket_index(time: i64) -> i64 {
    time.div_euclid(SAMPLE_PERIOD_SECS)
}

/// The caller-reported outcome of one attempt against the protected
/// service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    /// The attempt completed normally.
    Success,
    /// The attempt failed.
    Failure,
    /// The gate itself refused the attempt.
    Rejection,
}

impl OutcomeKind {
    /// Stable name used in counter keys and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::Failure => "failure",
            OutcomeKind::Rejection => "rejection",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate statistics for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketStats {
    /// Successful attempts.
    pub successes: u64,
    /// Failed attempts.
    pub failures: u64,
    /// Attempts refused by the gate.
    pub rejections: u64,
}

impl BucketStats {
    /// Requests counted toward the failure rate. Excludes rejections.
    pub fn total(&self) -> u64 {
        self.successes + self.failures
    }

    /// Fraction of counted requests that succeeded; 0 when nothing was
    /// counted.
    pub fn success_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.successes as f64 / total as f64
        }
    }
}

/// Records outcomes into time buckets and aggregates bucket statistics.
///
/// All persistence goes through the injected [`CounterStore`]; gates in
/// different processes sharing one store observe the same statistics.
pub struct WindowMonitor {
    service: String,
    store: Arc<dyn CounterStore>,
    clock: Arc<dyn TimeSource>,
}

impl WindowMonitor {
    /// Monitor the named service, persisting counters in `store`.
    pub fn new(
        service: impl Into<String>,
        store: Arc<dyn CounterStore>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            service: service.into(),
            store,
            clock,
        }
    }

    /// Name of the protected service.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Index of the bucket whose statistics currently drive decisions:
    /// the most recently completed one.
    pub fn reference_bucket(&self) -> i64 {
        bucket_index(self.clock.now()) - 1
    }

    /// Count one outcome in the bucket covering the current time.
    ///
    /// Safe to call from many threads at once; lost-update protection is
    /// delegated to the store's atomic increment.
    pub fn record(&self, kind: OutcomeKind) -> StoreResult<()> {
        let bucket = bucket_index(self.clock.now());
        let count = self.store.increment(&self.key(bucket, kind))?;
        metrics::record_outcome(&self.service, kind);
        tracing::debug!(
            service = %self.service,
            bucket,
            kind = %kind,
            count,
            "Outcome recorded"
        );
        Ok(())
    }

    /// Statistics for the most recently completed bucket. Pure read.
    pub fn stats_for_previous_period(&self) -> StoreResult<BucketStats> {
        self.stats_for_bucket(self.reference_bucket())
    }

    /// Statistics for an arbitrary bucket. Absent counters read as zero.
    pub fn stats_for_bucket(&self, bucket: i64) -> StoreResult<BucketStats> {
        Ok(BucketStats {
            successes: self.store.get(&self.key(bucket, OutcomeKind::Success))?,
            failures: self.store.get(&self.key(bucket, OutcomeKind::Failure))?,
            rejections: self.store.get(&self.key(bucket, OutcomeKind::Rejection))?,
        })
    }

    // Distinct (service, bucket, kind) triples map to distinct keys for
    // service names not containing ':'.
    fn key(&self, bucket: i64, kind: OutcomeKind) -> String {
        format!("{}:{}:{}", self.service, bucket, kind.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryCounterStore;
    use crate::time::ManualTimeSource;

    fn monitor_at(start: i64) -> (WindowMonitor, Arc<ManualTimeSource>) {
        let clock = Arc::new(ManualTimeSource::new(start));
        let store = Arc::new(InMemoryCounterStore::new());
        let monitor = WindowMonitor::new("svc", store, clock.clone());
        (monitor, clock)
    }

    #[test]
    fn test_bucket_index_floors_toward_negative_infinity() {
        assert_eq!(bucket_index(0), 0);
        assert_eq!(bucket_index(59), 0);
        assert_eq!(bucket_index(60), 1);
        assert_eq!(bucket_index(-1), -1);
        assert_eq!(bucket_index(-60), -1);
        assert_eq!(bucket_index(-61), -2);
    }

    #[test]
    fn test_events_land_in_the_bucket_covering_their_time() {
        let (monitor, clock) = monitor_at(0);

        monitor.record(OutcomeKind::Failure).unwrap();
        clock.set(59);
        monitor.record(OutcomeKind::Success).unwrap();
        clock.set(60);
        monitor.record(OutcomeKind::Success).unwrap();

        let first = monitor.stats_for_bucket(0).unwrap();
        assert_eq!(first.failures, 1);
        assert_eq!(first.successes, 1);

        let second = monitor.stats_for_bucket(1).unwrap();
        assert_eq!(second.successes, 1);
        assert_eq!(second.failures, 0);
    }

    #[test]
    fn test_previous_period_is_the_last_completed_bucket() {
        let (monitor, clock) = monitor_at(30);
        monitor.record(OutcomeKind::Failure).unwrap();

        // Still inside the live bucket: previous period is empty.
        clock.set(59);
        assert_eq!(
            monitor.stats_for_previous_period().unwrap(),
            BucketStats::default()
        );

        clock.set(60);
        let stats = monitor.stats_for_previous_period().unwrap();
        assert_eq!(stats.failures, 1);
    }

    #[test]
    fn test_total_excludes_rejections() {
        let stats = BucketStats {
            successes: 2,
            failures: 3,
            rejections: 95,
        };
        assert_eq!(stats.total(), 5);
        assert_eq!(stats.success_rate(), 0.4);
    }

    #[test]
    fn test_success_rate_is_zero_without_samples() {
        assert_eq!(BucketStats::default().success_rate(), 0.0);
    }

    #[test]
    fn test_keys_do_not_collide_across_kinds_or_buckets() {
        let (monitor, _) = monitor_at(0);
        let keys = [
            monitor.key(0, OutcomeKind::Success),
            monitor.key(0, OutcomeKind::Failure),
            monitor.key(0, OutcomeKind::Rejection),
            monitor.key(1, OutcomeKind::Success),
            monitor.key(-1, OutcomeKind::Success),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
