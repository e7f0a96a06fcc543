//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! monitor and breaker produce:
//!     → tracing events at call sites (structured fields)
//!     → counters and gauges through metrics.rs
//!
//! Consumers:
//!     → whatever subscriber/recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber or recorder; with none
//!   installed, emission is a no-op
//! - Metric updates are cheap (atomic increments in the recorder)
//! - Labels carry the service name so one recorder can serve many gates

pub mod metrics;
