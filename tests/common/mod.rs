//! Shared utilities for gate behavior tests.

use std::sync::Arc;

use circuit_gate::{
    CircuitBreaker, CircuitBreakerBuilder, InMemoryCounterStore, ManualTimeSource,
    SequenceSource,
};

/// Start-of-minute epoch second used by most scenarios.
pub const START_TIME: i64 = 1_407_424_500;

/// A gate plus handles to its injected collaborators.
pub struct Harness {
    pub breaker: CircuitBreaker,
    pub clock: Arc<ManualTimeSource>,
    pub store: Arc<InMemoryCounterStore>,
}

/// Gate wired to a manual clock, a fresh in-memory store and evenly spaced
/// random fractions (100 per cycle), starting at `START_TIME`.
pub fn deterministic_gate(service: &str) -> Harness {
    deterministic_gate_with(service, |builder| builder)
}

/// Same as [`deterministic_gate`], with a hook to adjust the builder.
pub fn deterministic_gate_with(
    service: &str,
    adjust: impl FnOnce(CircuitBreakerBuilder) -> CircuitBreakerBuilder,
) -> Harness {
    init_test_logging();
    let clock = Arc::new(ManualTimeSource::new(START_TIME));
    let store = Arc::new(InMemoryCounterStore::new());
    let builder = CircuitBreaker::builder(service)
        .store(store.clone())
        .time_source(clock.clone())
        .random_source(Arc::new(SequenceSource::evenly_spaced(100)));
    let breaker = adjust(builder).build().expect("test gate config is valid");
    Harness {
        breaker,
        clock,
        store,
    }
}

/// Install a subscriber so `RUST_LOG=circuit_gate=debug cargo test` shows
/// gate decisions. Safe to call from every test; later calls are no-ops.
pub fn init_test_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "circuit_gate=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Replay outcomes at explicit times, driving the manual clock.
#[allow(dead_code)]
pub fn register_requests(harness: &Harness, requests: &[(i64, bool)]) {
    for &(time, success) in requests {
        harness.clock.set(time);
        if success {
            harness.breaker.register_success().unwrap();
        } else {
            harness.breaker.register_failure().unwrap();
        }
    }
}

/// Make 100 admission checks, registering each outcome the way a caller
/// would, and assert how many were admitted.
///
/// The harness random source cycles 100 evenly spaced fractions, so with a
/// throttle of `p` exactly `p * 100` checks are admitted.
#[allow(dead_code)]
pub fn assert_throttle_percent(harness: &Harness, expected: usize) {
    let mut times_closed = 0;
    for _ in 0..100 {
        if harness.breaker.is_closed().unwrap() {
            times_closed += 1;
            harness.breaker.register_success().unwrap();
        } else {
            harness.breaker.register_rejection().unwrap();
        }
    }
    assert_eq!(times_closed, expected, "admitted calls out of 100");
}
