//! Forecast configuration
//!
//! Every field has a default, so an empty configuration is valid. Values can
//! be layered from an optional file and from `UMKM_FORECAST_*` environment
//! variables, e.g. `UMKM_FORECAST_EPOCHS=100`.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "UMKM_FORECAST";

/// What to do when the train/test split leaves no windows for evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyTestPolicy {
    /// Fail the forecast with `ForecastError::EmptyTestSet`
    #[default]
    Reject,
    /// Issue the forecast without MAE/RMSE
    OmitMetrics,
}

/// Parameters for one forecast invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Width of the input window in days
    #[serde(default = "default_n_steps")]
    pub n_steps: usize,
    /// Passes over the training windows
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    /// Leading share of windows used for training
    #[serde(default = "default_train_fraction")]
    pub train_fraction: f64,
    /// Width of the recurrent hidden state
    #[serde(default = "default_hidden_units")]
    pub hidden_units: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Maximum global gradient norm per update; 0 disables clipping
    #[serde(default = "default_gradient_clip")]
    pub gradient_clip: f64,
    /// Seed for weight initialisation and batch shuffling
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Shuffle training windows between epochs
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
    #[serde(default)]
    pub empty_test_policy: EmptyTestPolicy,
    /// Caller-side minimum history before a forecast is attempted
    #[serde(default = "default_min_observations")]
    pub min_observations: usize,
}

fn default_n_steps() -> usize {
    7
}
fn default_epochs() -> usize {
    50
}
fn default_train_fraction() -> f64 {
    0.8
}
fn default_hidden_units() -> usize {
    50
}
fn default_learning_rate() -> f64 {
    0.001
}
fn default_batch_size() -> usize {
    32
}
fn default_gradient_clip() -> f64 {
    1.0
}
fn default_seed() -> u64 {
    42
}
fn default_shuffle() -> bool {
    true
}
fn default_min_observations() -> usize {
    10
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            n_steps: default_n_steps(),
            epochs: default_epochs(),
            train_fraction: default_train_fraction(),
            hidden_units: default_hidden_units(),
            learning_rate: default_learning_rate(),
            batch_size: default_batch_size(),
            gradient_clip: default_gradient_clip(),
            seed: default_seed(),
            shuffle: default_shuffle(),
            empty_test_policy: EmptyTestPolicy::default(),
            min_observations: default_min_observations(),
        }
    }
}

impl ForecastConfig {
    /// Load configuration from an optional file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, config::Environment::with_prefix(ENV_PREFIX))
    }

    pub(crate) fn load_with_env(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(environment.try_parsing(true))
            .build()?;

        let config: ForecastConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Set the window width
    pub fn with_n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = n_steps;
        self
    }

    /// Set the number of training epochs
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the training share of the split
    pub fn with_train_fraction(mut self, train_fraction: f64) -> Self {
        self.train_fraction = train_fraction;
        self
    }

    /// Set the initialisation and shuffling seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the empty test set policy
    pub fn with_empty_test_policy(mut self, policy: EmptyTestPolicy) -> Self {
        self.empty_test_policy = policy;
        self
    }

    /// Check that every parameter is usable
    pub fn validate(&self) -> Result<()> {
        if self.n_steps == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_steps must be positive".to_string(),
            ));
        }
        if self.epochs == 0 {
            return Err(ForecastError::InvalidParameter(
                "epochs must be positive".to_string(),
            ));
        }
        if !(self.train_fraction > 0.0 && self.train_fraction <= 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "train_fraction must be in (0, 1], got {}",
                self.train_fraction
            )));
        }
        if self.hidden_units == 0 {
            return Err(ForecastError::InvalidParameter(
                "hidden_units must be positive".to_string(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if self.batch_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "batch_size must be positive".to_string(),
            ));
        }
        if !(self.gradient_clip.is_finite() && self.gradient_clip >= 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "gradient_clip must be zero or positive, got {}",
                self.gradient_clip
            )));
        }
        Ok(())
    }
}
