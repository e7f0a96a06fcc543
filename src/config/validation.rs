//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: `GateConfig → Result<(), Vec<ValidationError>>`
//! - Runs before a config is accepted into a gate

use std::fmt;

use crate::config::schema::GateConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // `!(x > 0.0)` also catches NaN.
    if !(config.recovery_factor > 0.0) {
        errors.push(ValidationError {
            field: "recovery_factor",
            message: format!("must be positive, got {}", config.recovery_factor),
        });
    }

    if !(0.0..=1.0).contains(&config.success_rate_threshold) {
        errors.push(ValidationError {
            field: "success_rate_threshold",
            message: format!(
                "must lie in [0, 1], got {}",
                config.success_rate_threshold
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GateConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_are_collected() {
        let config = GateConfig {
            recovery_factor: -1.0,
            success_rate_threshold: 1.5,
            ..GateConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "recovery_factor");
        assert_eq!(errors[1].field, "success_rate_threshold");
    }

    #[test]
    fn test_nan_recovery_factor_is_rejected() {
        let config = GateConfig {
            recovery_factor: f64::NAN,
            ..GateConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
