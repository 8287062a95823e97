//! Held-out evaluation of a fitted regressor in original sales units

use crate::error::{ForecastError, Result};
use crate::models::FittedRegressor;
use sales_math::{mean_absolute_error, root_mean_squared_error, MinMaxScaler, Window};
use serde::{Deserialize, Serialize};

/// Error metrics for forecast evaluation, in units sold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Number of test windows scored
    pub samples: usize,
}

impl std::fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Evaluation ({} windows):", self.samples)?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        Ok(())
    }
}

/// Scores a fitted regressor on test windows
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    scaler: &'a MinMaxScaler,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator that inverts values with `scaler`
    pub fn new(scaler: &'a MinMaxScaler) -> Self {
        Self { scaler }
    }

    /// Compute MAE and RMSE over `test` in original units
    ///
    /// Returns `EmptyTestSet` instead of NaN metrics when there is nothing to
    /// score, and `TrainingFailed` if the model produces non-finite output.
    pub fn evaluate<F: FittedRegressor>(
        &self,
        model: &F,
        test: &[Window],
    ) -> Result<EvaluationMetrics> {
        if test.is_empty() {
            return Err(ForecastError::EmptyTestSet);
        }

        let scaled_predictions = model.predict_windows(test)?;
        if scaled_predictions.iter().any(|p| !p.is_finite()) {
            return Err(ForecastError::TrainingFailed(
                "model produced non-finite predictions on the test set".to_string(),
            ));
        }

        let predicted = self.scaler.inverse_transform(&scaled_predictions);
        let actual: Vec<f64> = test
            .iter()
            .map(|w| self.scaler.inverse_scale(w.target))
            .collect();

        Ok(EvaluationMetrics {
            mae: mean_absolute_error(&predicted, &actual)?,
            rmse: root_mean_squared_error(&predicted, &actual)?,
            samples: test.len(),
        })
    }
}
