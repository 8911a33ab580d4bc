//! Forecast accuracy for a set of joined observations

use crate::features::JoinedObservation;
use sales_math::accuracy::{
    mean_absolute_error, mean_error, root_mean_squared_error, root_mean_squared_log_error,
};
use serde::{Deserialize, Serialize};

/// Accuracy summary over the rows that have actual sales
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracySummary {
    /// All rows considered
    pub rows: usize,
    /// Rows with an observed value
    pub matched: usize,
    /// Matched rows that also have a defined forecast; the metrics use these
    pub scored: usize,
    /// Mean Absolute Error
    pub mae: Option<f64>,
    /// Root Mean Squared Error
    pub rmse: Option<f64>,
    /// Mean residual (observed - predicted)
    pub bias: Option<f64>,
    /// Root Mean Squared Log Error, missing when any value is negative
    pub rmsle: Option<f64>,
    pub stockouts: usize,
    pub overstocks: usize,
}

impl AccuracySummary {
    pub fn from_observations(rows: &[JoinedObservation]) -> Self {
        let (actual, predicted): (Vec<f64>, Vec<f64>) = rows
            .iter()
            .filter(|row| !row.predicted.is_nan())
            .filter_map(|row| row.observed.map(|sales| (sales, row.predicted)))
            .unzip();

        Self {
            rows: rows.len(),
            matched: rows.iter().filter(|row| row.is_matched()).count(),
            scored: actual.len(),
            mae: mean_absolute_error(&actual, &predicted).ok(),
            rmse: root_mean_squared_error(&actual, &predicted).ok(),
            bias: mean_error(&actual, &predicted).ok(),
            rmsle: root_mean_squared_log_error(&actual, &predicted).ok(),
            stockouts: rows.iter().filter(|row| row.stockout_flag).count(),
            overstocks: rows.iter().filter(|row| row.overstock_flag).count(),
        }
    }

    /// Rows for which no actual sales were found
    pub fn unmatched(&self) -> usize {
        self.rows - self.matched
    }
}

fn metric(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.4}", v))
}

impl std::fmt::Display for AccuracySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy:")?;
        writeln!(f, "  Rows:       {} ({} without actuals)", self.rows, self.unmatched())?;
        writeln!(f, "  Scored:     {}", self.scored)?;
        writeln!(f, "  MAE:        {}", metric(self.mae))?;
        writeln!(f, "  RMSE:       {}", metric(self.rmse))?;
        writeln!(f, "  Bias:       {}", metric(self.bias))?;
        writeln!(f, "  RMSLE:      {}", metric(self.rmsle))?;
        writeln!(f, "  Stockouts:  {}", self.stockouts)?;
        writeln!(f, "  Overstocks: {}", self.overstocks)?;
        Ok(())
    }
}
