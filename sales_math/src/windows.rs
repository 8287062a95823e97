//! Sliding windows and ordered train/test splitting

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// One supervised example: `width` consecutive inputs and the value that follows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Consecutive input values, oldest first
    pub inputs: Vec<f64>,
    /// Value immediately following the inputs
    pub target: f64,
}

impl Window {
    /// Number of input steps
    pub fn width(&self) -> usize {
        self.inputs.len()
    }
}

/// Slice `values` into overlapping windows of `width` inputs
///
/// Produces exactly `values.len() - width` windows. Window `i` covers
/// `values[i..i + width]` and targets `values[i + width]`.
pub fn sliding_windows(values: &[f64], width: usize) -> Result<Vec<Window>> {
    if width == 0 {
        return Err(MathError::InvalidInput(
            "Window width must be positive".to_string(),
        ));
    }

    if values.len() < width + 1 {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} values for a window of width {}, got {}",
            width + 1,
            width,
            values.len()
        )));
    }

    Ok(values
        .windows(width + 1)
        .map(|w| Window {
            inputs: w[..width].to_vec(),
            target: w[width],
        })
        .collect())
}

/// Index separating the leading `fraction` of `len` items from the rest
///
/// Uses floor rounding, so `split_index(4, 0.8) == 3`.
pub fn split_index(len: usize, fraction: f64) -> Result<usize> {
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(MathError::InvalidInput(format!(
            "Split fraction must be in (0, 1], got {}",
            fraction
        )));
    }

    let index = (len as f64 * fraction).floor() as usize;
    Ok(index.min(len))
}

/// Split items into an ordered prefix and suffix at `fraction`
pub fn train_test_split<T>(items: &[T], fraction: f64) -> Result<(&[T], &[T])> {
    let index = split_index(items.len(), fraction)?;
    Ok(items.split_at(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_window_contents() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let windows = sliding_windows(&values, 3).unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].inputs, vec![1.0, 2.0, 3.0]);
        assert_eq!(windows[0].target, 4.0);
        assert_eq!(windows[1].inputs, vec![2.0, 3.0, 4.0]);
        assert_eq!(windows[1].target, 5.0);
        assert!(windows.iter().all(|w| w.width() == 3));
    }

    #[rstest]
    #[case(8, 7, 1)]
    #[case(11, 7, 4)]
    #[case(30, 7, 23)]
    #[case(2, 1, 1)]
    fn test_window_count(#[case] len: usize, #[case] width: usize, #[case] expected: usize) {
        let values: Vec<f64> = (0..len).map(|i| i as f64).collect();
        let windows = sliding_windows(&values, width).unwrap();
        assert_eq!(windows.len(), expected);
        assert_eq!(windows.len(), len - width);
    }

    #[test]
    fn test_too_short_for_window() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(matches!(
            sliding_windows(&values, 7),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            sliding_windows(&values, 5),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            sliding_windows(&values, 0),
            Err(MathError::InvalidInput(_))
        ));
    }

    #[rstest]
    #[case(4, 0.8, 3)]
    #[case(5, 0.8, 4)]
    #[case(1, 0.8, 0)]
    #[case(10, 0.8, 8)]
    #[case(23, 0.8, 18)]
    #[case(7, 1.0, 7)]
    fn test_split_index(#[case] len: usize, #[case] fraction: f64, #[case] expected: usize) {
        assert_eq!(split_index(len, fraction).unwrap(), expected);
    }

    #[test]
    fn test_split_preserves_order() {
        let items: Vec<usize> = (0..9).collect();
        let (train, test) = train_test_split(&items, 0.8).unwrap();

        assert_eq!(train, &[0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(test, &[7, 8]);
        assert_eq!(train.len() + test.len(), items.len());
    }

    #[test]
    fn test_invalid_fraction() {
        assert!(split_index(10, 0.0).is_err());
        assert!(split_index(10, 1.5).is_err());
        assert!(split_index(10, f64::NAN).is_err());
    }
}
