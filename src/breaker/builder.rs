//! Gate assembly.
//!
//! # Responsibilities
//! - Collect named options and injectable collaborators
//! - Validate the configuration before any gate exists
//!
//! # Design Decisions
//! - The builder is consumed by `build`; a validated gate cannot be
//!   reconfigured through it afterwards
//! - Defaults are production collaborators: in-memory store, system
//!   clock, thread-local RNG

use std::sync::Arc;

use crate::breaker::CircuitBreaker;
use crate::config::loader::ConfigError;
use crate::config::schema::GateConfig;
use crate::config::validation::validate_config;
use crate::monitor::WindowMonitor;
use crate::random::{RandomSource, ThreadRngSource};
use crate::store::{CounterStore, InMemoryCounterStore};
use crate::time::{SystemTimeSource, TimeSource};

/// Assembles a [`CircuitBreaker`] from named options.
pub struct CircuitBreakerBuilder {
    service: String,
    config: GateConfig,
    store: Option<Arc<dyn CounterStore>>,
    time_source: Option<Arc<dyn TimeSource>>,
    random_source: Option<Arc<dyn RandomSource>>,
}

impl CircuitBreakerBuilder {
    /// Start with defaults for the named service.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            config: GateConfig::default(),
            store: None,
            time_source: None,
            random_source: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: GateConfig) -> Self {
        self.config = config;
        self
    }

    /// Counters live here. Gates sharing one store share observed
    /// statistics.
    pub fn store(mut self, store: Arc<dyn CounterStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Clock used to assign events and decisions to buckets.
    pub fn time_source(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.time_source = Some(clock);
        self
    }

    /// Uniform random source for probabilistic admission.
    pub fn random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random_source = Some(random);
        self
    }

    /// The gate may open.
    pub fn enabled(mut self) -> Self {
        self.config.enabled = true;
        self
    }

    /// Observe-only mode: outcomes are recorded, the gate never blocks.
    pub fn disabled(mut self) -> Self {
        self.config.enabled = false;
        self
    }

    /// Minimum reference-bucket total before the gate may trigger.
    pub fn minimum_requests(mut self, minimum: u64) -> Self {
        self.config.minimum_requests_before_trigger = minimum;
        self
    }

    /// Validate the configuration and assemble the gate.
    pub fn build(self) -> Result<CircuitBreaker, ConfigError> {
        validate_config(&self.config).map_err(ConfigError::Validation)?;

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryCounterStore::new()));
        let clock = self
            .time_source
            .unwrap_or_else(|| Arc::new(SystemTimeSource));
        let random = self
            .random_source
            .unwrap_or_else(|| Arc::new(ThreadRngSource));

        let monitor = WindowMonitor::new(self.service, store, clock);
        tracing::info!(
            service = %monitor.service(),
            enabled = self.config.enabled,
            minimum_requests = self.config.minimum_requests_before_trigger,
            probabilistic = self.config.probabilistic,
            "Circuit gate built"
        );

        Ok(CircuitBreaker::from_parts(self.config, monitor, random))
    }
}
