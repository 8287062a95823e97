//! # Sales Forecast
//!
//! Short-horizon forecasting of daily sales for small businesses.
//!
//! ## Features
//!
//! - Daily aggregation of sales line items (CSV or in-memory)
//! - Min-max scaling and fixed-width windowing of the sales history
//! - A single-layer recurrent regressor trained with Adam on MSE
//! - Held-out evaluation with MAE and RMSE in units sold
//! - One-step-ahead forecast with pluggable persistence
//!
//! ## Pipeline
//!
//! Every forecast is computed from scratch:
//!
//! 1. The [`SequencePreparer`] scales the series and slices it into windows
//! 2. Windows are split into an ordered training prefix and test suffix
//! 3. A [`SequenceRegressor`] is fitted on the training windows
//! 4. The [`Evaluator`] scores the fitted model on the test windows
//! 5. The model predicts the value following the latest window
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use sales_forecast::{ForecastConfig, Forecaster, SalesSeries};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let series = SalesSeries::from_quantities(start, &[5, 7, 6, 8, 9, 10, 12, 11, 13, 14, 15]);
//!
//! let forecaster = Forecaster::new(ForecastConfig::default())?;
//! let result = forecaster.forecast(&series)?;
//! println!("next day: {:.1} units (MAE {:?})", result.predicted_quantity(), result.mae());
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod forecaster;
pub mod models;
pub mod preparer;
pub mod service;
pub mod sink;

// Re-export commonly used types
pub use crate::config::{EmptyTestPolicy, ForecastConfig};
pub use crate::data::{DailySales, DataLoader, SaleLineItem, SalesSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::evaluation::{EvaluationMetrics, Evaluator};
pub use crate::forecaster::{forecast, ForecastResult, Forecaster};
pub use crate::models::{
    CancelFlag, FittedRegressor, LinearRegressor, RecurrentRegressor, SequenceRegressor,
    TrainingSettings,
};
pub use crate::preparer::{PreparedSequence, SequencePreparer};
pub use crate::service::ForecastService;
pub use crate::sink::{ForecastRecord, ForecastSink, InMemorySink, JsonLinesSink};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
