//! In-memory counter store for single-process gates.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::{CounterStore, StoreResult};

#[derive(Debug)]
struct Entry {
    value: u64,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self) -> bool {
        match self.expires_at {
            Some(deadline) => Instant::now() < deadline,
            None => true,
        }
    }
}

/// A `CounterStore` backed by a concurrent map.
///
/// Entries may be given a store-wide TTL so long-lived processes do not
/// accumulate counters for buckets that will never be read again. Expiry is
/// enforced lazily: an expired entry reads as zero and is reset on the next
/// increment.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    entries: DashMap<String, Entry>,
    default_ttl: Option<Duration>,
}

impl InMemoryCounterStore {
    /// Create a store whose entries never expire.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose entries expire `ttl` after their last write.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl: Some(ttl),
        }
    }

    /// Number of stored entries, including any not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn deadline(&self, explicit: Option<Duration>) -> Option<Instant> {
        explicit.or(self.default_ttl).map(|ttl| Instant::now() + ttl)
    }
}

impl CounterStore for InMemoryCounterStore {
    fn get(&self, key: &str) -> StoreResult<u64> {
        Ok(self
            .entries
            .get(key)
            .filter(|entry| entry.is_live())
            .map(|entry| entry.value)
            .unwrap_or(0))
    }

    fn set(&self, key: &str, value: u64, ttl: Option<Duration>) -> StoreResult<()> {
        let expires_at = self.deadline(ttl);
        self.entries
            .insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    fn increment(&self, key: &str) -> StoreResult<u64> {
        // entry() holds the shard lock for the whole read-modify-write,
        // which gives the per-key atomicity the trait requires.
        let mut entry = self.entries.entry(key.to_string()).or_insert(Entry {
            value: 0,
            expires_at: None,
        });
        if !entry.is_live() {
            entry.value = 0;
        }
        entry.value += 1;
        entry.expires_at = self.deadline(None);
        Ok(entry.value)
    }
}
