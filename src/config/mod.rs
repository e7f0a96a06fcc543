//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → consumed by CircuitBreakerBuilder::build
//! ```
//!
//! # Design Decisions
//! - Config is immutable once a gate is built; the only runtime knobs are
//!   the breaker's explicit setters
//! - All fields have defaults so a minimal config is an empty table
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GateConfig;
pub use validation::{validate_config, ValidationError};
