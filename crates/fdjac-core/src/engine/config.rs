use serde::Deserialize;
use thiserror::Error;

use crate::core::model::DEFAULT_PERTURBATION_FACTOR;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("worker_count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),

    #[error("perturbation_factor must be finite and different from 1.0, got {0}")]
    InvalidPerturbationFactor(f64),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Settings for one evaluation run.
///
/// `worker_count` is the hard ceiling on simultaneously live worker tasks.
/// `perturbation_factor` is the multiplicative step applied to one parameter
/// at a time when assembling finite-difference columns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalConfig {
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    #[serde(default = "default_perturbation_factor")]
    pub perturbation_factor: f64,
}

fn default_worker_count() -> usize {
    1
}

fn default_perturbation_factor() -> f64 {
    DEFAULT_PERTURBATION_FACTOR
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            perturbation_factor: default_perturbation_factor(),
        }
    }
}

impl EvalConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count < 1 {
            return Err(ConfigError::InvalidWorkerCount(self.worker_count));
        }
        if !self.perturbation_factor.is_finite() || self.perturbation_factor == 1.0 {
            return Err(ConfigError::InvalidPerturbationFactor(
                self.perturbation_factor,
            ));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct EvalConfigBuilder {
    worker_count: Option<usize>,
    perturbation_factor: Option<f64>,
}

impl EvalConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn worker_count(mut self, count: usize) -> Self {
        self.worker_count = Some(count);
        self
    }

    pub fn perturbation_factor(mut self, factor: f64) -> Self {
        self.perturbation_factor = Some(factor);
        self
    }

    pub fn build(self) -> Result<EvalConfig, ConfigError> {
        let config = EvalConfig {
            worker_count: self.worker_count.unwrap_or_else(default_worker_count),
            perturbation_factor: self
                .perturbation_factor
                .unwrap_or_else(default_perturbation_factor),
        };
        config.validate()?;
        Ok(config)
    }
}
