//! Sequence preparation: scaling and windowing of a sales series
//!
//! The scaler is fitted once over the whole series before the train/test
//! split, so its bounds include values that later appear only as test
//! targets. Forecast values depend on this; changing it is a product
//! decision, so it is kept as is.

use crate::data::SalesSeries;
use crate::error::{ForecastError, Result};
use sales_math::{sliding_windows, train_test_split, MathError, MinMaxScaler, Window};

/// Scaled series, fitted scaler and windows for one forecast invocation
#[derive(Debug, Clone)]
pub struct PreparedSequence {
    scaler: MinMaxScaler,
    scaled: Vec<f64>,
    windows: Vec<Window>,
    n_steps: usize,
}

impl PreparedSequence {
    /// Scaler fitted to the full series
    pub fn scaler(&self) -> &MinMaxScaler {
        &self.scaler
    }

    /// Series values mapped into `[0, 1]`, in date order
    pub fn scaled(&self) -> &[f64] {
        &self.scaled
    }

    /// All windows in temporal order
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// Window width
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// The most recent `n_steps` scaled values, used for the next-step forecast
    pub fn latest_inputs(&self) -> &[f64] {
        &self.scaled[self.scaled.len() - self.n_steps..]
    }

    /// Split windows into an ordered training prefix and test suffix
    pub fn split(&self, train_fraction: f64) -> Result<(&[Window], &[Window])> {
        train_test_split(&self.windows, train_fraction).map_err(|e| match e {
            MathError::InvalidInput(msg) => ForecastError::InvalidParameter(msg),
            other => ForecastError::Math(other),
        })
    }
}

/// Turns a daily sales series into scaled training windows
#[derive(Debug, Clone, Copy)]
pub struct SequencePreparer {
    n_steps: usize,
}

impl Default for SequencePreparer {
    fn default() -> Self {
        Self { n_steps: 7 }
    }
}

impl SequencePreparer {
    /// Create a preparer producing windows of `n_steps` inputs
    pub fn new(n_steps: usize) -> Result<Self> {
        if n_steps == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_steps must be positive".to_string(),
            ));
        }
        Ok(Self { n_steps })
    }

    /// Window width
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Scale and window `series`
    ///
    /// Fails with `InsufficientData` when the series has fewer than
    /// `n_steps + 1` points and with `DegenerateSeries` when every quantity
    /// is identical. Length is checked first.
    pub fn prepare(&self, series: &SalesSeries) -> Result<PreparedSequence> {
        let required = self.n_steps + 1;
        if series.len() < required {
            return Err(ForecastError::InsufficientData {
                required,
                available: series.len(),
            });
        }

        let values = series.values();
        let scaler = MinMaxScaler::fit(&values).map_err(|e| match e {
            MathError::DegenerateRange(value) => ForecastError::DegenerateSeries(value),
            other => ForecastError::Math(other),
        })?;

        let scaled = scaler.transform(&values);
        let windows = sliding_windows(&scaled, self.n_steps)?;

        Ok(PreparedSequence {
            scaler,
            scaled,
            windows,
            n_steps: self.n_steps,
        })
    }
}
