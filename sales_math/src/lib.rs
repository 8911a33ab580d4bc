//! # Sales Math
//!
//! Numeric building blocks for forecast-vs-actual analysis.
//! Values may be missing (`None` or NaN); every helper here skips them the
//! same way a dataframe mean does instead of failing.

use thiserror::Error;

pub mod accuracy;
pub mod aggregate;

pub use accuracy::{
    mean_absolute_error, mean_error, root_mean_squared_error, root_mean_squared_log_error,
};
pub use aggregate::RunningMean;

/// Errors that can occur in sales calculations
#[derive(Error, Debug, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;
