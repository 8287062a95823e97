//! End-to-end forecast invocation
//!
//! One call prepares the series, splits the windows, fits a fresh model,
//! evaluates it on the held-out windows and predicts the value following the
//! most recent `n_steps` observations. Nothing is shared between calls.

use crate::config::{EmptyTestPolicy, ForecastConfig};
use crate::data::SalesSeries;
use crate::error::{ForecastError, Result};
use crate::evaluation::{EvaluationMetrics, Evaluator};
use crate::models::{CancelFlag, FittedRegressor, RecurrentRegressor, SequenceRegressor};
use crate::preparer::SequencePreparer;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Result of a forecast invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    predicted_quantity: f64,
    mae: Option<f64>,
    rmse: Option<f64>,
    train_windows: usize,
    test_windows: usize,
}

impl ForecastResult {
    /// Forecast units sold for the period after the last observation
    pub fn predicted_quantity(&self) -> f64 {
        self.predicted_quantity
    }

    /// Mean absolute error on the held-out windows, if evaluated
    pub fn mae(&self) -> Option<f64> {
        self.mae
    }

    /// Root mean squared error on the held-out windows, if evaluated
    pub fn rmse(&self) -> Option<f64> {
        self.rmse
    }

    /// Number of windows used to fit the model
    pub fn train_windows(&self) -> usize {
        self.train_windows
    }

    /// Number of windows held out for evaluation
    pub fn test_windows(&self) -> usize {
        self.test_windows
    }
}

/// Orchestrates preparation, training, evaluation and prediction
#[derive(Debug, Clone)]
pub struct Forecaster<R: SequenceRegressor = RecurrentRegressor> {
    config: ForecastConfig,
    preparer: SequencePreparer,
    regressor: R,
}

impl Forecaster<RecurrentRegressor> {
    /// Create a forecaster backed by the recurrent regressor
    pub fn new(config: ForecastConfig) -> Result<Self> {
        let regressor = RecurrentRegressor::from_config(&config)?;
        Self::with_regressor(config, regressor)
    }
}

impl<R: SequenceRegressor> Forecaster<R> {
    /// Create a forecaster backed by any regressor
    pub fn with_regressor(config: ForecastConfig, regressor: R) -> Result<Self> {
        config.validate()?;
        let preparer = SequencePreparer::new(config.n_steps)?;

        Ok(Self {
            config,
            preparer,
            regressor,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast the next period of `series`
    pub fn forecast(&self, series: &SalesSeries) -> Result<ForecastResult> {
        self.forecast_with_cancel(series, &CancelFlag::new())
    }

    /// Forecast the next period, stopping between epochs if `cancel` is raised
    pub fn forecast_with_cancel(
        &self,
        series: &SalesSeries,
        cancel: &CancelFlag,
    ) -> Result<ForecastResult> {
        let prepared = self.preparer.prepare(series)?;
        let (train, test) = prepared.split(self.config.train_fraction)?;
        debug!(
            observations = series.len(),
            train_windows = train.len(),
            test_windows = test.len(),
            "prepared sales sequence"
        );

        if train.is_empty() {
            return Err(ForecastError::EmptyTrainSet);
        }
        if test.is_empty() {
            match self.config.empty_test_policy {
                EmptyTestPolicy::Reject => return Err(ForecastError::EmptyTestSet),
                EmptyTestPolicy::OmitMetrics => {
                    warn!("no held-out windows; forecast will be issued without metrics")
                }
            }
        }

        let model = self.regressor.fit(train, cancel)?;

        let metrics: Option<EvaluationMetrics> = if test.is_empty() {
            None
        } else {
            Some(Evaluator::new(prepared.scaler()).evaluate(&model, test)?)
        };

        let next_scaled = model.predict(prepared.latest_inputs())?;
        if !next_scaled.is_finite() {
            return Err(ForecastError::TrainingFailed(
                "model produced a non-finite forecast".to_string(),
            ));
        }
        let predicted_quantity = prepared.scaler().inverse_scale(next_scaled);

        info!(
            model = model.name(),
            predicted_quantity,
            mae = metrics.map(|m| m.mae),
            rmse = metrics.map(|m| m.rmse),
            "sales forecast generated"
        );

        Ok(ForecastResult {
            predicted_quantity,
            mae: metrics.map(|m| m.mae),
            rmse: metrics.map(|m| m.rmse),
            train_windows: train.len(),
            test_windows: test.len(),
        })
    }
}

/// Forecast the next period with the default recurrent model
pub fn forecast(series: &SalesSeries, n_steps: usize, epochs: usize) -> Result<ForecastResult> {
    let config = ForecastConfig::default()
        .with_n_steps(n_steps)
        .with_epochs(epochs);
    Forecaster::new(config)?.forecast(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinearRegressor;
    use chrono::NaiveDate;

    fn series(quantities: &[u64]) -> SalesSeries {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        SalesSeries::from_quantities(start, quantities)
    }

    #[test]
    fn test_reference_series() {
        let s = series(&[5, 7, 6, 8, 9, 10, 12, 11, 13, 14, 15]);
        let result = forecast(&s, 7, 50).unwrap();

        assert_eq!(result.train_windows(), 3);
        assert_eq!(result.test_windows(), 1);
        assert!(result.predicted_quantity().is_finite());
        assert!(result.mae().unwrap() >= 0.0);
        assert!(result.rmse().unwrap() >= 0.0);
    }

    #[test]
    fn test_empty_test_set_policy() {
        let s = series(&[5, 7, 6, 8, 9, 10, 12, 11, 13, 14, 15]);

        let reject = ForecastConfig::default().with_train_fraction(1.0);
        assert!(matches!(
            Forecaster::new(reject).unwrap().forecast(&s),
            Err(ForecastError::EmptyTestSet)
        ));

        let omit = ForecastConfig::default()
            .with_train_fraction(1.0)
            .with_empty_test_policy(EmptyTestPolicy::OmitMetrics);
        let result = Forecaster::new(omit).unwrap().forecast(&s).unwrap();
        assert_eq!(result.mae(), None);
        assert_eq!(result.rmse(), None);
        assert_eq!(result.train_windows(), 4);
        assert!(result.predicted_quantity().is_finite());
    }

    #[test]
    fn test_single_window_has_no_training_data() {
        let s = series(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(matches!(
            forecast(&s, 7, 5),
            Err(ForecastError::EmptyTrainSet)
        ));
    }

    #[test]
    fn test_custom_regressor() {
        let config = ForecastConfig::default().with_n_steps(3).with_epochs(20);
        let regressor = LinearRegressor::from_config(&config).unwrap();
        let forecaster = Forecaster::with_regressor(config, regressor).unwrap();

        let result = forecaster
            .forecast(&series(&[3, 5, 4, 6, 8, 7, 9, 11, 10, 12]))
            .unwrap();
        assert_eq!(result.train_windows() + result.test_windows(), 7);
        assert!(result.predicted_quantity().is_finite());
    }

    #[test]
    fn test_cancelled_forecast() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let forecaster = Forecaster::new(ForecastConfig::default()).unwrap();

        let s = series(&[5, 7, 6, 8, 9, 10, 12, 11, 13, 14, 15]);
        assert!(matches!(
            forecaster.forecast_with_cancel(&s, &cancel),
            Err(ForecastError::Cancelled { epoch: 0 })
        ));
    }

    /// Regressor whose fitted model always predicts NaN
    #[derive(Debug, Clone)]
    struct Diverged;

    impl FittedRegressor for Diverged {
        fn predict(&self, _inputs: &[f64]) -> Result<f64> {
            Ok(f64::NAN)
        }

        fn loss_history(&self) -> &[f64] {
            &[]
        }

        fn name(&self) -> &str {
            "diverged"
        }
    }

    impl SequenceRegressor for Diverged {
        type Fitted = Diverged;

        fn fit(&self, _windows: &[sales_math::Window], _cancel: &CancelFlag) -> Result<Diverged> {
            Ok(Diverged)
        }

        fn name(&self) -> &str {
            "diverged"
        }
    }

    #[test]
    fn test_non_finite_forecast_is_rejected() {
        let s = series(&[5, 7, 6, 8, 9, 10, 12, 11, 13, 14, 15]);

        // No held-out windows, so the next-step prediction is the first one checked
        let config = ForecastConfig::default()
            .with_train_fraction(1.0)
            .with_empty_test_policy(EmptyTestPolicy::OmitMetrics);
        let forecaster = Forecaster::with_regressor(config, Diverged).unwrap();
        match forecaster.forecast(&s) {
            Err(ForecastError::TrainingFailed(msg)) => assert!(msg.contains("forecast")),
            other => panic!("Expected TrainingFailed, got {other:?}"),
        }

        let forecaster = Forecaster::with_regressor(ForecastConfig::default(), Diverged).unwrap();
        assert!(matches!(
            forecaster.forecast(&s),
            Err(ForecastError::TrainingFailed(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ForecastConfig::default().with_n_steps(0);
        assert!(matches!(
            Forecaster::new(config),
            Err(ForecastError::InvalidParameter(_))
        ));
    }
}
