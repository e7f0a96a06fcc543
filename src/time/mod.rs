//! Time sources.
//!
//! # Responsibilities
//! - Supply "now" as an integer count of epoch seconds
//! - Let tests drive the clock deterministically
//!
//! # Design Decisions
//! - Seconds granularity; buckets are derived by integer division
//! - Monotonicity is assumed, never enforced: a test may move time
//!   backwards and bucket arithmetic must stay consistent

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time in whole seconds.
pub trait TimeSource: Send + Sync {
    /// Current time as seconds since the Unix epoch.
    fn now(&self) -> i64;
}

/// Wall-clock time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

/// Manually driven time source for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    seconds: AtomicI64,
}

impl ManualTimeSource {
    /// Create a clock pinned at `start` seconds.
    pub fn new(start: i64) -> Self {
        Self {
            seconds: AtomicI64::new(start),
        }
    }

    /// Pin the clock to an absolute value.
    pub fn set(&self, seconds: i64) {
        self.seconds.store(seconds, Ordering::Relaxed);
    }

    /// Move the clock by `delta` seconds (negative moves it backwards).
    pub fn advance(&self, delta: i64) {
        self.seconds.fetch_add(delta, Ordering::Relaxed);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> i64 {
        self.seconds.load(Ordering::Relaxed)
    }
}
