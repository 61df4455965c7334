//! Configuration for PageRank runs.
//!
//! Every field has a default, so a JSON config file only needs to name the
//! values it overrides.
//!
//! ```json
//! { "damping": 0.85, "max_iterations": 500 }
//! ```

use crate::error::{LinkRankError, Result};
use crate::pagerank::convergence::{DEFAULT_CONSECUTIVE_ROUNDS, DEFAULT_PERPLEXITY_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tuning for a PageRank run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageRankConfig {
    /// Damping factor (typically 0.85)
    pub damping: f64,
    /// Perplexity change below which an iteration counts as stable
    pub perplexity_threshold: f64,
    /// Consecutive stable iterations required to stop
    pub consecutive_rounds: usize,
    /// Hard cap on iterations; reaching it ends the run unconverged
    pub max_iterations: usize,
    /// Page count from which iterations run in parallel
    pub parallel_threshold: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            perplexity_threshold: DEFAULT_PERPLEXITY_THRESHOLD,
            consecutive_rounds: DEFAULT_CONSECUTIVE_ROUNDS,
            max_iterations: 1000,
            parallel_threshold: 10_000,
        }
    }
}

impl PageRankConfig {
    /// Load a config from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| LinkRankError::io(e, path))?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is in range
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.damping) {
            return Err(LinkRankError::Config(format!(
                "damping must be in [0, 1), got {}",
                self.damping
            )));
        }
        if !(self.perplexity_threshold > 0.0) {
            return Err(LinkRankError::Config(format!(
                "perplexity_threshold must be positive, got {}",
                self.perplexity_threshold
            )));
        }
        if self.consecutive_rounds == 0 {
            return Err(LinkRankError::Config(
                "consecutive_rounds must be at least 1".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(LinkRankError::Config(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
