//! Experiment configuration.
//!
//! Every field has a default, so an empty TOML file is a valid
//! configuration. Validation is eager: a bad value fails the whole run
//! before any optimizer starts.
//!
//! ```toml
//! train_ratio = 0.7
//! search_trees = 25
//! final_trees = 50
//!
//! [ga]
//! population_size = 15
//! max_iter = 15
//!
//! [pso]
//! max_iter = 15
//!
//! [sa]
//! max_call = 150
//! ```

use crate::error::{FeatselError, Result};
use crate::metaheuristics::{GaConfig, PsoConfig, SaConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default train/test split ratio.
pub const DEFAULT_TRAIN_RATIO: f64 = 0.7;

/// Default tree budget of each fitness evaluation.
pub const DEFAULT_SEARCH_TREES: usize = 25;

/// Default tree budget of the final models.
pub const DEFAULT_FINAL_TREES: usize = 50;

/// Everything a run needs besides the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Fraction of each class kept for training.
    pub train_ratio: f64,
    /// Trees per fitness evaluation.
    pub search_trees: usize,
    /// Trees per final model.
    pub final_trees: usize,
    /// Forest training threads; 0 uses one per core.
    pub n_threads: usize,
    /// Seed of the stratified split.
    pub split_seed: u64,
    /// Base seed of classifier training.
    pub search_seed: u64,
    /// Wall-clock limit for the whole search, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Genetic algorithm.
    pub ga: GaConfig,
    /// Particle swarm.
    pub pso: PsoConfig,
    /// Simulated annealing.
    pub sa: SaConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            train_ratio: DEFAULT_TRAIN_RATIO,
            search_trees: DEFAULT_SEARCH_TREES,
            final_trees: DEFAULT_FINAL_TREES,
            n_threads: 0,
            split_seed: 123,
            search_seed: 42,
            timeout_secs: None,
            ga: GaConfig::default(),
            pso: PsoConfig::default(),
            sa: SaConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Read and validate a TOML file.
    ///
    /// # Errors
    ///
    /// I/O and parse failures, then anything [`validate`](Self::validate)
    /// rejects.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents).map_err(|e| match e {
            FeatselError::Data { message } => {
                FeatselError::data(format!("{}: {message}", path.display()))
            }
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate TOML text.
    ///
    /// # Errors
    ///
    /// Parse failures and anything [`validate`](Self::validate) rejects.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`FeatselError::Data`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FeatselError::data(format!("TOML: {e}")))
    }

    /// Check every field, including the optimizer sections.
    ///
    /// # Errors
    ///
    /// Returns [`FeatselError::ConfigurationError`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !(self.train_ratio > 0.0 && self.train_ratio < 1.0) {
            return Err(FeatselError::config("train_ratio", self.train_ratio, "in (0, 1)"));
        }
        if self.search_trees == 0 {
            return Err(FeatselError::config("search_trees", 0, ">= 1"));
        }
        if self.final_trees == 0 {
            return Err(FeatselError::config("final_trees", 0, ">= 1"));
        }
        if self.timeout_secs == Some(0) {
            return Err(FeatselError::config("timeout_secs", 0, ">= 1"));
        }
        self.ga.validate()?;
        self.pso.validate()?;
        self.sa.validate()
    }

    /// The search deadline, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
