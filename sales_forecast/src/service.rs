//! Store-level forecast generation
//!
//! Applies the caller-side history minimum, runs a forecast and persists the
//! record. A record is written only when the whole pipeline succeeds.

use crate::config::ForecastConfig;
use crate::data::SalesSeries;
use crate::error::{ForecastError, Result};
use crate::forecaster::Forecaster;
use crate::models::{CancelFlag, RecurrentRegressor, SequenceRegressor};
use crate::sink::{ForecastRecord, ForecastSink};
use chrono::{NaiveDate, Utc};
use tracing::{info, instrument};

/// Generates and stores forecasts for stores
#[derive(Debug)]
pub struct ForecastService<S: ForecastSink, R: SequenceRegressor = RecurrentRegressor> {
    forecaster: Forecaster<R>,
    sink: S,
    min_observations: usize,
}

impl<S: ForecastSink> ForecastService<S> {
    /// Create a service using the recurrent regressor
    pub fn new(config: ForecastConfig, sink: S) -> Result<Self> {
        let min_observations = config.min_observations;
        Ok(Self {
            forecaster: Forecaster::new(config)?,
            sink,
            min_observations,
        })
    }
}

impl<S: ForecastSink, R: SequenceRegressor> ForecastService<S, R> {
    /// Create a service around an existing forecaster
    pub fn with_forecaster(forecaster: Forecaster<R>, sink: S) -> Self {
        let min_observations = forecaster.config().min_observations;
        Self {
            forecaster,
            sink,
            min_observations,
        }
    }

    /// Storage backing this service
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Forecast the next day for a store and persist the result
    #[instrument(skip(self, series), fields(observations = series.len()))]
    pub fn generate(
        &mut self,
        store_id: u64,
        product_id: Option<u64>,
        series: &SalesSeries,
        forecast_date: NaiveDate,
    ) -> Result<ForecastRecord> {
        self.generate_with_cancel(store_id, product_id, series, forecast_date, &CancelFlag::new())
    }

    /// Same as [`generate`](Self::generate), abortable between training epochs
    pub fn generate_with_cancel(
        &mut self,
        store_id: u64,
        product_id: Option<u64>,
        series: &SalesSeries,
        forecast_date: NaiveDate,
        cancel: &CancelFlag,
    ) -> Result<ForecastRecord> {
        if series.len() < self.min_observations {
            return Err(ForecastError::InsufficientData {
                required: self.min_observations,
                available: series.len(),
            });
        }

        let result = self.forecaster.forecast_with_cancel(series, cancel)?;

        let record = ForecastRecord {
            store_id,
            product_id,
            forecast_date,
            predicted_quantity: result.predicted_quantity(),
            mae: result.mae(),
            rmse: result.rmse(),
            generated_at: Utc::now(),
        };
        self.sink.persist(&record)?;

        info!(store_id, %forecast_date, "forecast record stored");
        Ok(record)
    }

    /// Most recent stored forecast
    pub fn latest(&self) -> Result<Option<ForecastRecord>> {
        self.sink.latest()
    }
}
