//! Regression error metrics

use crate::{MathError, Result};

fn check_lengths(predicted: &[f64], actual: &[f64]) -> Result<()> {
    if predicted.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute an error metric over zero observations".to_string(),
        ));
    }
    if predicted.len() != actual.len() {
        return Err(MathError::InvalidInput(format!(
            "Predicted length ({}) doesn't match actual length ({})",
            predicted.len(),
            actual.len()
        )));
    }
    Ok(())
}

/// Mean of `|predicted - actual|`
pub fn mean_absolute_error(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_lengths(predicted, actual)?;

    let sum: f64 = predicted
        .iter()
        .zip(actual.iter())
        .map(|(p, a)| (p - a).abs())
        .sum();

    Ok(sum / predicted.len() as f64)
}

/// Mean of `(predicted - actual)^2`
pub fn mean_squared_error(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_lengths(predicted, actual)?;

    let sum: f64 = predicted
        .iter()
        .zip(actual.iter())
        .map(|(p, a)| (p - a).powi(2))
        .sum();

    Ok(sum / predicted.len() as f64)
}

/// Square root of the mean squared error
pub fn root_mean_squared_error(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    mean_squared_error(predicted, actual).map(f64::sqrt)
}
