use serde::Deserialize;

use crate::error::{ForecastError, ForecastResult};

/// Root application configuration. Loaded from environment variables
/// with the prefix `CAMPAIGN_FORECAST__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

/// Ensemble training knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Number of trees in the forest.
    #[serde(default = "default_tree_count")]
    pub tree_count: usize,
    /// Fraction of the dataset held out for accuracy evaluation.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Seed for the single random source threaded through synthesis,
    /// splitting, bootstrap resampling and feature subsampling.
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
    /// Depth cap per tree.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// Bounds for the synthesized training dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default = "default_dataset_size")]
    pub dataset_size: usize,
    #[serde(default = "default_budget_min")]
    pub budget_min: f64,
    #[serde(default = "default_budget_max")]
    pub budget_max: f64,
    #[serde(default = "default_duration_min")]
    pub duration_min: u32,
    #[serde(default = "default_duration_max")]
    pub duration_max: u32,
}

// Default functions
fn default_tree_count() -> usize {
    100
}
fn default_test_fraction() -> f64 {
    0.2
}
fn default_random_seed() -> u64 {
    42
}
fn default_max_depth() -> usize {
    10
}
fn default_dataset_size() -> usize {
    100
}
fn default_budget_min() -> f64 {
    1_000.0
}
fn default_budget_max() -> f64 {
    50_000.0
}
fn default_duration_min() -> u32 {
    7
}
fn default_duration_max() -> u32 {
    90
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            tree_count: default_tree_count(),
            test_fraction: default_test_fraction(),
            random_seed: default_random_seed(),
            max_depth: default_max_depth(),
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            dataset_size: default_dataset_size(),
            budget_min: default_budget_min(),
            budget_max: default_budget_max(),
            duration_min: default_duration_min(),
            duration_max: default_duration_max(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            synthesis: SynthesisConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CAMPAIGN_FORECAST")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Reject option combinations the pipeline cannot train with.
    pub fn validate(&self) -> ForecastResult<()> {
        if self.model.tree_count < 1 {
            return Err(ForecastError::Config(
                "model.tree_count must be at least 1".into(),
            ));
        }
        if !(self.model.test_fraction > 0.0 && self.model.test_fraction < 1.0) {
            return Err(ForecastError::Config(
                "model.test_fraction must lie in (0, 1)".into(),
            ));
        }
        if self.synthesis.dataset_size < 2 {
            return Err(ForecastError::Config(
                "synthesis.dataset_size must be at least 2".into(),
            ));
        }
        if self.synthesis.budget_min >= self.synthesis.budget_max {
            return Err(ForecastError::Config(
                "synthesis.budget_min must be below budget_max".into(),
            ));
        }
        if self.synthesis.duration_min >= self.synthesis.duration_max {
            return Err(ForecastError::Config(
                "synthesis.duration_min must be below duration_max".into(),
            ));
        }
        Ok(())
    }
}
