//! Error types for the sales_forecast crate

use sales_math::MathError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Fewer observations than the window width plus one target
    #[error("Insufficient data: need at least {required} observations, got {available}")]
    InsufficientData { required: usize, available: usize },

    /// Every observed quantity is identical, so scaling is undefined
    #[error("Degenerate series: every observation equals {0}")]
    DegenerateSeries(f64),

    /// No windows were left for evaluation after the train/test split
    #[error("Empty test set: no windows left for evaluation")]
    EmptyTestSet,

    /// No windows were left for training after the train/test split
    #[error("Empty training set: no windows left for fitting the model")]
    EmptyTrainSet,

    /// Training produced non-finite losses, weights or predictions
    #[error("Training failed: {0}")]
    TrainingFailed(String),

    /// Training was cancelled between epochs
    #[error("Training cancelled after {epoch} completed epochs")]
    Cancelled { epoch: usize },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from numeric building blocks
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from loading configuration
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl ForecastError {
    /// Whether the error means "no forecast possible for this data" rather than a fault
    pub fn is_data_limitation(&self) -> bool {
        matches!(
            self,
            ForecastError::InsufficientData { .. }
                | ForecastError::DegenerateSeries(_)
                | ForecastError::EmptyTestSet
                | ForecastError::EmptyTrainSet
        )
    }
}
