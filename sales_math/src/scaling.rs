//! Min-max scaling into the unit interval
//!
//! The scaler stores the fitted minimum and maximum so that any value
//! produced on the scaled axis can be mapped back to original units.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Linear scaler mapping `[min, max]` onto `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    /// Fit the scaler to the range of `values`
    ///
    /// Fails with [`MathError::DegenerateRange`] when every value is equal,
    /// since the mapping would divide by zero.
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit a scaler to an empty series".to_string(),
            ));
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Series contains non-finite values".to_string(),
            ));
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if max <= min {
            return Err(MathError::DegenerateRange(min));
        }

        Ok(Self { min, max })
    }

    /// Build a scaler from known bounds
    pub fn from_bounds(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(MathError::InvalidInput(
                "Scaler bounds must be finite".to_string(),
            ));
        }
        if max <= min {
            return Err(MathError::DegenerateRange(min));
        }
        Ok(Self { min, max })
    }

    /// Smallest value seen during fitting
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest value seen during fitting
    pub fn max(&self) -> f64 {
        self.max
    }

    fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Map a value from original units onto the scaled axis
    pub fn scale(&self, value: f64) -> f64 {
        (value - self.min) / self.range()
    }

    /// Map a scaled value back into original units
    pub fn inverse_scale(&self, scaled: f64) -> f64 {
        scaled * self.range() + self.min
    }

    /// Scale every value in a slice
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.scale(v)).collect()
    }

    /// Invert every value in a slice
    pub fn inverse_transform(&self, scaled: &[f64]) -> Vec<f64> {
        scaled.iter().map(|&s| self.inverse_scale(s)).collect()
    }
}
