//! Shared counter storage.
//!
//! # Responsibilities
//! - Persist outcome counters so multiple gate instances can share
//!   observed statistics
//! - Provide atomic per-key increments
//!
//! # Design Decisions
//! - Keys are opaque strings; key derivation belongs to the window monitor
//! - Absent keys read as zero; counters are created on first increment
//! - Entry lifetime (TTL, eviction) is the store's concern, not the core's
//! - `increment` must be linearizable per key; this is the one hard
//!   requirement the gate places on a store implementation

use std::time::Duration;

use thiserror::Error;

pub mod memory;

pub use memory::InMemoryCounterStore;

/// Errors surfaced by a counter store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store failed to serve the request.
    #[error("counter store error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Key/value storage for outcome counters.
pub trait CounterStore: Send + Sync {
    /// Read a counter. Absent keys read as zero.
    fn get(&self, key: &str) -> StoreResult<u64>;

    /// Write a counter, optionally bounding its lifetime.
    fn set(&self, key: &str, value: u64, ttl: Option<Duration>) -> StoreResult<()>;

    /// Atomically add one to a counter, creating it at zero first if
    /// absent. Returns the new value.
    fn increment(&self, key: &str) -> StoreResult<u64>;
}
