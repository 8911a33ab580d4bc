//! Tabular output for charting and file export
//!
//! Column names follow the source data (`ds`, `yhat`, `sales`) so chart code
//! written against the raw files works unchanged.

use crate::error::Result;
use crate::features::JoinedObservation;
use polars::prelude::*;
use serde::Serialize;
use std::io::Write;

/// Joined or filtered observations as a DataFrame
pub fn observations_frame(rows: &[JoinedObservation]) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        Series::new(
            "ds",
            rows.iter()
                .map(|r| r.date.format("%Y-%m-%d").to_string())
                .collect::<Vec<String>>(),
        ),
        Series::new(
            "store_nbr",
            rows.iter().map(|r| r.store_nbr).collect::<Vec<i64>>(),
        ),
        Series::new(
            "family",
            rows.iter().map(|r| r.family.as_str()).collect::<Vec<&str>>(),
        ),
        Series::new("yhat", rows.iter().map(|r| r.predicted).collect::<Vec<f64>>()),
        Series::new(
            "sales",
            rows.iter().map(|r| r.observed).collect::<Vec<Option<f64>>>(),
        ),
        Series::new(
            "residual",
            rows.iter().map(|r| r.residual).collect::<Vec<Option<f64>>>(),
        ),
        Series::new(
            "stockout_flag",
            rows.iter().map(|r| r.stockout_flag).collect::<Vec<bool>>(),
        ),
        Series::new(
            "overstock_flag",
            rows.iter().map(|r| r.overstock_flag).collect::<Vec<bool>>(),
        ),
        Series::new(
            "onpromotion",
            rows.iter().map(|r| r.onpromotion).collect::<Vec<i64>>(),
        ),
    ])?;
    Ok(df)
}

/// Write serializable rows as CSV with a header; missing values become empty cells
pub fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
