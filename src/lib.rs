//! Admission-control gate ("circuit breaker") for failing downstream
//! dependencies.
//!
//! Callers report the outcome of each attempt (success, failure or
//! rejection) and ask the gate before each attempt whether the call is
//! permitted ("closed") or should be skipped ("open"). Decisions are driven
//! by the failure rate observed in the most recently *completed* 60-second
//! window, so they are stable for the duration of a window and cheap to
//! compute.
//!
//! # Architecture Overview
//!
//! ```text
//!                  register_success / register_failure / register_rejection
//! caller ────────────────────────────────▶ CircuitBreaker
//!                                                │
//!                                           record(kind)
//!                                                ▼
//!                                          WindowMonitor ───▶ CounterStore
//!                                                ▲            (shared, atomic
//!                  is_closed()                   │             increments)
//! caller ◀──────── allow/deny ── policy ── stats_for_previous_period
//!                                  │
//!                    binary (success rate cutoff)
//!                    or probabilistic (growth-capped throttle)
//! ```
//!
//! Time, storage and randomness are injected trait objects, so decisions
//! are fully deterministic under test.
//!
//! # Quick Start
//!
//! ```
//! use circuit_gate::CircuitBreaker;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gate = CircuitBreaker::builder("payments-api").build()?;
//!
//! if gate.is_closed()? {
//!     // call the downstream service, then report what happened
//!     gate.register_success()?;
//! } else {
//!     gate.register_rejection()?;
//! }
//! # Ok(())
//! # }
//! ```

// Core subsystems
pub mod breaker;
pub mod monitor;

// Injectable collaborators
pub mod random;
pub mod store;
pub mod time;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use breaker::{CircuitBreaker, CircuitBreakerBuilder};
pub use config::{load_config, ConfigError, GateConfig};
pub use monitor::{bucket_index, BucketStats, OutcomeKind, WindowMonitor, SAMPLE_PERIOD_SECS};
pub use random::{RandomSource, SequenceSource, ThreadRngSource};
pub use store::{CounterStore, InMemoryCounterStore, StoreError};
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource};
