//! Simulation configuration
//!
//! Loaded from TOML. Every field has a default, so a config file only needs to
//! name what it changes:
//!
//! ```toml
//! duration = 60
//! min_arrivals = 0
//! max_arrivals = 3
//! seed = 7
//! compute_routes = true
//! transition_matrix = "data/transition_matrix.toml"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Parameters for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks (minutes) to simulate
    pub duration: u64,

    /// Fewest customers that can arrive in one tick (inclusive)
    pub min_arrivals: u32,

    /// Most customers that can arrive in one tick (inclusive)
    pub max_arrivals: u32,

    /// Seed for the simulation RNG. `None` draws a random seed.
    pub seed: Option<u64>,

    /// Efficient customers walk straight onto a zone cell; inefficient ones
    /// stop next to the zone and avoid walking through unrelated sections.
    pub efficient: bool,

    /// Compute a walking route for every customer transition
    pub compute_routes: bool,

    /// TOML transition matrix. Falls back to the built-in store matrix.
    pub transition_matrix: Option<PathBuf>,

    /// Text layout of the store, sharing the built-in zone regions. Falls
    /// back to the built-in store layout.
    pub layout: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration: 20,
            min_arrivals: 0,
            max_arrivals: 3,
            seed: None,
            efficient: false,
            compute_routes: false,
            transition_matrix: None,
            layout: None,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.min_arrivals > self.max_arrivals {
            return Err(SimError::InvalidConfig(format!(
                "min_arrivals ({}) must be <= max_arrivals ({})",
                self.min_arrivals, self.max_arrivals
            )));
        }
        Ok(())
    }

    /// The configured seed, or a fresh random one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
