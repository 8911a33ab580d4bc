//! Forecast accuracy metrics
//!
//! All functions take `(actual, predicted)` pairs of equal, non-zero length.
//! Callers are expected to drop rows without an observed value first.

use crate::{MathError, Result};

fn check_pairs(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() {
        return Err(MathError::InvalidInput(format!(
            "Actual and predicted values differ in length ({} vs {})",
            actual.len(),
            predicted.len()
        )));
    }
    if actual.is_empty() {
        return Err(MathError::InsufficientData(
            "At least one actual/predicted pair is required".to_string(),
        ));
    }
    Ok(())
}

fn mean_of<I: Iterator<Item = f64>>(values: I, n: usize) -> f64 {
    values.sum::<f64>() / n as f64
}

/// Mean of `actual - predicted`; positive means the forecast ran low
pub fn mean_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pairs(actual, predicted)?;
    Ok(mean_of(
        actual.iter().zip(predicted).map(|(a, p)| a - p),
        actual.len(),
    ))
}

/// Mean Absolute Error
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pairs(actual, predicted)?;
    Ok(mean_of(
        actual.iter().zip(predicted).map(|(a, p)| (a - p).abs()),
        actual.len(),
    ))
}

/// Root Mean Squared Error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pairs(actual, predicted)?;
    let mse = mean_of(
        actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)),
        actual.len(),
    );
    Ok(mse.sqrt())
}

/// Root Mean Squared Logarithmic Error
///
/// Defined only for non-negative values, matching the usual
/// `sqrt(mean((ln(1 + a) - ln(1 + p))^2))` definition.
pub fn root_mean_squared_log_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pairs(actual, predicted)?;
    if actual.iter().chain(predicted).any(|v| *v < 0.0) {
        return Err(MathError::InvalidInput(
            "RMSLE cannot be used when values contain negative numbers".to_string(),
        ));
    }
    let msle = mean_of(
        actual
            .iter()
            .zip(predicted)
            .map(|(a, p)| (a.ln_1p() - p.ln_1p()).powi(2)),
        actual.len(),
    );
    Ok(msle.sqrt())
}
