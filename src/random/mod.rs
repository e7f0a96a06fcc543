//! Uniform random sources for probabilistic admission.
//!
//! # Design Decisions
//! - Injectable trait instead of a global RNG, so probabilistic decisions
//!   are deterministic under test
//! - Implementations return values in `[0, 1)`

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// Source of uniform random fractions in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    /// Next uniform value in `[0, 1)`.
    fn next_fraction(&self) -> f64;
}

/// Thread-local RNG source; the default for production gates.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next_fraction(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Cycles through a fixed sequence of fractions.
///
/// With evenly spaced fractions, a throttle of `p` admits exactly
/// `p * len` calls per cycle, which lets tests assert exact admission
/// counts instead of statistical bounds.
#[derive(Debug)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl SequenceSource {
    /// Cycle the given fractions.
    ///
    /// # Panics
    /// If `values` is empty or any value lies outside `[0, 1)`.
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "sequence must not be empty");
        assert!(
            values.iter().all(|value| (0.0..1.0).contains(value)),
            "sequence values must lie in [0, 1)"
        );
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }

    /// `len` fractions evenly spaced across `[0, 1)`, placed at interval
    /// midpoints.
    pub fn evenly_spaced(len: usize) -> Self {
        assert!(len > 0, "sequence must not be empty");
        let values = (0..len)
            .map(|index| (index as f64 + 0.5) / len as f64)
            .collect();
        Self::new(values)
    }
}

impl RandomSource for SequenceSource {
    fn next_fraction(&self) -> f64 {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.values.len();
        self.values[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_rng_stays_in_range() {
        let source = ThreadRngSource;
        for _ in 0..100 {
            let value = source.next_fraction();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_sequence_cycles() {
        let source = SequenceSource::new(vec![0.1, 0.9]);
        assert_eq!(source.next_fraction(), 0.1);
        assert_eq!(source.next_fraction(), 0.9);
        assert_eq!(source.next_fraction(), 0.1);
    }

    #[test]
    fn test_evenly_spaced_admission_counts_are_exact() {
        let source = SequenceSource::evenly_spaced(60);
        let admitted = (0..60)
            .filter(|_| source.next_fraction() < 1.0 / 3.0)
            .count();
        assert_eq!(admitted, 20);
    }

    #[test]
    #[should_panic(expected = "must lie in [0, 1)")]
    fn test_rejects_out_of_range_values() {
        SequenceSource::new(vec![0.5, 1.0]);
    }
}
