//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Configuration for one circuit gate.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GateConfig {
    /// Whether the gate may ever report "open". A disabled gate still
    /// records outcomes (observe-only mode).
    pub enabled: bool,

    /// Minimum request total in the reference bucket before the gate may
    /// trigger. Below this, the gate behaves as if no failures were seen.
    pub minimum_requests_before_trigger: u64,

    /// Success rate at or above which binary mode keeps the gate closed.
    pub success_rate_threshold: f64,

    /// Admit probabilistically in proportion to the observed success rate
    /// instead of the hard binary cutoff.
    pub probabilistic: bool,

    /// Multiplicative cap on throttle growth per bucket transition
    /// (probabilistic mode only). 1.0 means the throttle never grows.
    pub recovery_factor: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            minimum_requests_before_trigger: 3,
            success_rate_threshold: 0.5,
            probabilistic: false,
            recovery_factor: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GateConfig::default();
        assert!(config.enabled);
        assert_eq!(config.minimum_requests_before_trigger, 3);
        assert_eq!(config.success_rate_threshold, 0.5);
        assert!(!config.probabilistic);
        assert_eq!(config.recovery_factor, 2.0);
    }

    #[test]
    fn test_empty_table_deserializes_to_defaults() {
        let config: GateConfig = toml::from_str("").unwrap();
        assert_eq!(config, GateConfig::default());
    }

    #[test]
    fn test_partial_table_keeps_remaining_defaults() {
        let config: GateConfig = toml::from_str(
            "minimum_requests_before_trigger = 5\nprobabilistic = true\n",
        )
        .unwrap();
        assert_eq!(config.minimum_requests_before_trigger, 5);
        assert!(config.probabilistic);
        assert_eq!(config.recovery_factor, 2.0);
    }
}
