//! # Sales Math
//!
//! Numeric building blocks shared by the sales forecasting pipeline.
//! This crate provides min-max scaling, sliding-window construction,
//! ordered train/test splitting and regression error metrics.

use thiserror::Error;

pub mod error_metrics;
pub mod scaling;
pub mod windows;

pub use error_metrics::{mean_absolute_error, mean_squared_error, root_mean_squared_error};
pub use scaling::MinMaxScaler;
pub use windows::{sliding_windows, split_index, train_test_split, Window};

/// Errors that can occur in sales-related calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate range: every value equals {0}")]
    DegenerateRange(f64),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;
