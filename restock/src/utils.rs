//! Parameter validation helpers

use crate::{RestockError, Result};

/// Validate a threshold is at least `min_value`
pub fn validate_threshold(value: u64, min_value: u64, name: &str) -> Result<()> {
    if value < min_value {
        return Err(RestockError::InvalidThreshold(format!(
            "{} must be at least {}",
            name, min_value
        )));
    }
    Ok(())
}

/// Validate that `lower` is strictly below `upper`
pub fn validate_ordering(lower: u64, upper: u64, lower_name: &str, upper_name: &str) -> Result<()> {
    if lower >= upper {
        return Err(RestockError::InvalidThreshold(format!(
            "{} ({}) must be below {} ({})",
            lower_name, lower, upper_name, upper
        )));
    }
    Ok(())
}
