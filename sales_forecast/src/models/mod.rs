//! Trainable regressors mapping a window of scaled sales to the next value
//!
//! A regressor is fitted on `(window, target)` pairs and yields a fitted
//! model that predicts one scaled value per window. Any implementation with
//! this contract can stand in for the default recurrent network.

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use sales_math::Window;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub mod linear;
pub mod optimizer;
pub mod recurrent;
mod training;

pub use linear::{LinearRegressor, TrainedLinear};
pub use recurrent::{RecurrentRegressor, TrainedRecurrent};

/// Shared flag used to abort training between epochs
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a flag that has not been raised
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; training stops before its next epoch
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Gradient descent settings shared by the trainable regressors
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSettings {
    /// Passes over the training windows
    pub epochs: usize,
    pub learning_rate: f64,
    pub batch_size: usize,
    /// Maximum global gradient norm; 0 disables clipping
    pub gradient_clip: f64,
    pub shuffle: bool,
    pub seed: u64,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self::from(&ForecastConfig::default())
    }
}

impl From<&ForecastConfig> for TrainingSettings {
    fn from(config: &ForecastConfig) -> Self {
        Self {
            epochs: config.epochs,
            learning_rate: config.learning_rate,
            batch_size: config.batch_size,
            gradient_clip: config.gradient_clip,
            shuffle: config.shuffle,
            seed: config.seed,
        }
    }
}

impl TrainingSettings {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.epochs == 0 || self.batch_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "epochs and batch_size must be positive".to_string(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
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

/// Fitted regressor producing one scaled prediction per input window
pub trait FittedRegressor: Debug {
    /// Predict the value following `inputs`
    fn predict(&self, inputs: &[f64]) -> Result<f64>;

    /// Predict every window in order
    fn predict_windows(&self, windows: &[Window]) -> Result<Vec<f64>> {
        windows.iter().map(|w| self.predict(&w.inputs)).collect()
    }

    /// Mean training loss recorded after each epoch
    fn loss_history(&self) -> &[f64];

    /// Name of the model
    fn name(&self) -> &str;
}

/// Regressor that can be fitted on training windows
pub trait SequenceRegressor: Debug {
    /// The type of fitted model produced
    type Fitted: FittedRegressor;

    /// Fit a fresh model on `windows`, checking `cancel` between epochs
    fn fit(&self, windows: &[Window], cancel: &CancelFlag) -> Result<Self::Fitted>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Width shared by every window, or an error if they disagree
pub(crate) fn common_width(windows: &[Window]) -> Result<usize> {
    let first = windows.first().ok_or(ForecastError::EmptyTrainSet)?;
    let width = first.width();

    if width == 0 {
        return Err(ForecastError::InvalidParameter(
            "Windows must contain at least one input".to_string(),
        ));
    }
    if windows.iter().any(|w| w.width() != width) {
        return Err(ForecastError::InvalidParameter(
            "All training windows must have the same width".to_string(),
        ));
    }

    Ok(width)
}

pub(crate) fn check_input_width(expected: usize, inputs: &[f64]) -> Result<()> {
    if inputs.len() != expected {
        return Err(ForecastError::InvalidParameter(format!(
            "Model expects {} input steps, got {}",
            expected,
            inputs.len()
        )));
    }
    Ok(())
}
