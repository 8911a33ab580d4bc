//! Error types for the forecast_insight crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while loading source tables or exporting results
#[derive(Debug, Error)]
pub enum InsightError {
    /// A value could not be interpreted (bad date, null key, ...)
    #[error("Data error: {0}")]
    DataError(String),

    /// A required column is absent from a source table
    #[error("Missing column '{column}' in {table} table")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while writing CSV exports
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, InsightError>;

impl From<PolarsError> for InsightError {
    fn from(err: PolarsError) -> Self {
        InsightError::PolarsError(err.to_string())
    }
}

/// Errors raised while building an [`InsightConfig`](crate::config::InsightConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] ::config::ConfigError),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}
