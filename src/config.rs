//! Engine configuration.
//!
//! Tunables for the built-in commands, loadable from a small JSON document
//! with `serde-json-core` so that a board can ship its settings in flash:
//!
//! ```rust
//! use tickshell::config::EngineConfig;
//!
//! let config = EngineConfig::from_json(r#"{"flash_delay_ticks": 2}"#).unwrap();
//! assert_eq!(config.flash_delay_ticks, 2);
//! assert_eq!(config.load_iterations, 500);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default number of ticks the LED stays in each state while flashing.
pub const DEFAULT_FLASH_DELAY_TICKS: u32 = 10_000_000;
/// Default number of reports emitted by the `load` command.
pub const DEFAULT_LOAD_ITERATIONS: u32 = 500;
/// Default number of arithmetic iterations `load` burns per cycle.
pub const DEFAULT_LOAD_WORK: u32 = 10_000;

/// Tunables shared with every unit through its [`Context`](crate::command::Context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Ticks spent in each half of a flash cycle.
    #[serde(default = "default_flash_delay_ticks")]
    pub flash_delay_ticks: u32,
    /// Number of value reports the `load` command prints before completing.
    #[serde(default = "default_load_iterations")]
    pub load_iterations: u32,
    /// Busy-work iterations performed by `load` between reports.
    #[serde(default = "default_load_work")]
    pub load_work: u32,
}

fn default_flash_delay_ticks() -> u32 {
    DEFAULT_FLASH_DELAY_TICKS
}

fn default_load_iterations() -> u32 {
    DEFAULT_LOAD_ITERATIONS
}

fn default_load_work() -> u32 {
    DEFAULT_LOAD_WORK
}

impl EngineConfig {
    /// Create a configuration holding the firmware defaults.
    pub const fn new() -> Self {
        Self {
            flash_delay_ticks: DEFAULT_FLASH_DELAY_TICKS,
            load_iterations: DEFAULT_LOAD_ITERATIONS,
            load_work: DEFAULT_LOAD_WORK,
        }
    }

    /// Parse a configuration from JSON. Missing fields keep their defaults.
    ///
    /// # Returns
    ///
    /// * `Ok(config)` - The parsed configuration
    /// * `Err(Error::Config)` - The document is not valid JSON or has wrongly typed fields
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let (config, _) = serde_json_core::from_str::<EngineConfig>(json).map_err(|_| {
            log::warn!("rejecting engine configuration");
            Error::Config
        })?;
        Ok(config)
    }

    /// Set the per-phase flash delay.
    pub const fn with_flash_delay_ticks(mut self, ticks: u32) -> Self {
        self.flash_delay_ticks = ticks;
        self
    }

    /// Set the number of `load` reports.
    pub const fn with_load_iterations(mut self, iterations: u32) -> Self {
        self.load_iterations = iterations;
        self
    }

    /// Set the busy-work performed by `load` between reports.
    pub const fn with_load_work(mut self, work: u32) -> Self {
        self.load_work = work;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
