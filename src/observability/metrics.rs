//! Metric emission helpers.
//!
//! # Metrics
//! - `circuit_gate_outcomes_total` (counter): reported outcomes by
//!   service, kind
//! - `circuit_gate_decisions_total` (counter): admission decisions by
//!   service, decision
//! - `circuit_gate_throttle` (gauge): throttle fraction granted for the
//!   current reference bucket, by service

use metrics::{counter, gauge};

use crate::monitor::OutcomeKind;

/// Count one reported outcome.
pub fn record_outcome(service: &str, kind: OutcomeKind) {
    counter!(
        "circuit_gate_outcomes_total",
        "service" => service.to_string(),
        "kind" => kind.as_str()
    )
    .increment(1);
}

/// Count one admission decision.
pub fn record_decision(service: &str, closed: bool) {
    let decision = if closed { "closed" } else { "open" };
    counter!(
        "circuit_gate_decisions_total",
        "service" => service.to_string(),
        "decision" => decision
    )
    .increment(1);
}

/// Publish the throttle fraction granted for the current reference bucket.
pub fn record_throttle(service: &str, fraction: f64) {
    gauge!("circuit_gate_throttle", "service" => service.to_string()).set(fraction);
}
