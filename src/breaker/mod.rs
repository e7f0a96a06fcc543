//! The decision engine.
//!
//! # Data Flow
//! ```text
//! is_closed():
//!     stats = monitor.stats_for_previous_period()
//!     total < minimum_requests  → closed (insufficient sample)
//!     gate disabled             → closed (observe-only)
//!     binary mode               → closed iff success_rate >= threshold
//!     probabilistic mode        → draw r in [0,1);
//!                                 closed iff r < capped throttle
//! ```
//!
//! # Design Decisions
//! - Decisions read only the previous completed bucket, so early failures
//!   in a live bucket cannot bias later decisions within the same bucket
//! - The recovery cap limits throttle growth, never decrease: a bad period
//!   takes effect immediately, recovery is spread over later periods
//! - The capped throttle is computed once per reference bucket and reused
//!   within it; each call still draws its own random fraction
//! - Throttle state is per-instance: gates sharing a store still shape
//!   their own recovery

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::schema::GateConfig;
use crate::monitor::{OutcomeKind, WindowMonitor};
use crate::observability::metrics;
use crate::random::RandomSource;
use crate::store::StoreResult;

mod builder;

pub use builder::CircuitBreakerBuilder;

/// Throttle state for the probabilistic policy.
#[derive(Debug, Clone, Copy)]
struct Dynamics {
    probabilistic: bool,
    recovery_factor: f64,
    /// Reference bucket the current throttle was computed for.
    reference_bucket: Option<i64>,
    /// Fraction of calls admitted while that bucket is the reference.
    throttle: f64,
}

/// Admission-control gate for one named service.
///
/// Callers report outcomes through the `register_*` methods and ask
/// [`is_closed`](CircuitBreaker::is_closed) before each attempt. All
/// methods take `&self`; the gate is safe to share across threads.
pub struct CircuitBreaker {
    monitor: WindowMonitor,
    enabled: bool,
    minimum_requests_before_trigger: u64,
    success_rate_threshold: f64,
    random: Arc<dyn RandomSource>,
    dynamics: Mutex<Dynamics>,
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("service", &self.service())
            .field("enabled", &self.enabled)
            .field(
                "minimum_requests_before_trigger",
                &self.minimum_requests_before_trigger,
            )
            .field("success_rate_threshold", &self.success_rate_threshold)
            .field("dynamics", &self.dynamics.lock().ok().map(|d| *d))
            .finish()
    }
}

impl CircuitBreaker {
    /// Start building a gate for `service`.
    pub fn builder(service: impl Into<String>) -> CircuitBreakerBuilder {
        CircuitBreakerBuilder::new(service)
    }

    pub(crate) fn from_parts(
        config: GateConfig,
        monitor: WindowMonitor,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            monitor,
            enabled: config.enabled,
            minimum_requests_before_trigger: config.minimum_requests_before_trigger,
            success_rate_threshold: config.success_rate_threshold,
            random,
            dynamics: Mutex::new(Dynamics {
                probabilistic: config.probabilistic,
                recovery_factor: config.recovery_factor,
                reference_bucket: None,
                throttle: 1.0,
            }),
        }
    }

    /// Name of the protected service.
    pub fn service(&self) -> &str {
        self.monitor.service()
    }

    /// Report a successful call to the protected service.
    pub fn register_success(&self) -> StoreResult<()> {
        self.monitor.record(OutcomeKind::Success)
    }

    /// Report a failed call to the protected service.
    pub fn register_failure(&self) -> StoreResult<()> {
        self.monitor.record(OutcomeKind::Failure)
    }

    /// Report a call the gate itself refused.
    ///
    /// Rejections are kept out of the failure rate; they exist so the
    /// realized throttle can be observed.
    pub fn register_rejection(&self) -> StoreResult<()> {
        self.monitor.record(OutcomeKind::Rejection)
    }

    /// Switch between binary and probabilistic admission. Takes effect on
    /// the next [`is_closed`](CircuitBreaker::is_closed) call.
    pub fn set_probabilistic_dynamics(&self, probabilistic: bool) {
        self.lock_dynamics().probabilistic = probabilistic;
    }

    /// Change how fast the throttle may grow per bucket transition.
    ///
    /// # Panics
    /// If `factor` is not positive: the throttle could then never recover,
    /// so the value is rejected as a usage error.
    pub fn set_recovery_factor(&self, factor: f64) {
        assert!(
            factor > 0.0,
            "recovery factor must be positive, got {factor}"
        );
        self.lock_dynamics().recovery_factor = factor;
    }

    /// Whether a call may proceed right now. Closed means allowed.
    ///
    /// The decision is driven entirely by the statistics of the most
    /// recently completed bucket; repeated calls within one bucket observe
    /// the same statistics.
    pub fn is_closed(&self) -> StoreResult<bool> {
        let stats = self.monitor.stats_for_previous_period()?;

        let closed = if stats.total() < self.minimum_requests_before_trigger {
            // Not enough samples to judge the dependency.
            true
        } else if !self.enabled {
            true
        } else {
            let success_rate = stats.success_rate();
            let probabilistic = self.lock_dynamics().probabilistic;
            if probabilistic {
                let throttle = self.current_throttle(success_rate);
                self.random.next_fraction() < throttle
            } else {
                success_rate >= self.success_rate_threshold
            }
        };

        metrics::record_decision(self.service(), closed);
        if closed {
            tracing::debug!(
                service = %self.service(),
                successes = stats.successes,
                failures = stats.failures,
                "Gate closed, call admitted"
            );
        } else {
            tracing::warn!(
                service = %self.service(),
                successes = stats.successes,
                failures = stats.failures,
                "Gate open, call refused"
            );
        }
        Ok(closed)
    }

    /// Throttle granted for the current reference bucket, computed and
    /// capped once per bucket transition.
    fn current_throttle(&self, success_rate: f64) -> f64 {
        let reference = self.monitor.reference_bucket();
        let mut dynamics = self.lock_dynamics();

        if dynamics.reference_bucket != Some(reference) {
            let cap = dynamics.throttle * dynamics.recovery_factor;
            let granted = success_rate.min(cap).clamp(0.0, 1.0);
            if granted < dynamics.throttle {
                tracing::warn!(
                    service = %self.service(),
                    throttle = granted,
                    success_rate,
                    "Throttle reduced"
                );
            } else if granted > dynamics.throttle {
                tracing::info!(
                    service = %self.service(),
                    throttle = granted,
                    "Throttle raised"
                );
            }
            dynamics.reference_bucket = Some(reference);
            dynamics.throttle = granted;
            metrics::record_throttle(self.service(), granted);
        }

        dynamics.throttle
    }

    fn lock_dynamics(&self) -> MutexGuard<'_, Dynamics> {
        self.dynamics.lock().expect("gate dynamics mutex poisoned")
    }
}
