//! Row-wise feature derivation
//!
//! A missing observation never raises: the residual stays missing and both
//! flags resolve to `false`, the same outcome a dataframe comparison against
//! a missing value gives.

use crate::data::ForecastRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Thresholds for the stockout and overstock heuristics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// A zero-sales day only counts as a stockout when the forecast exceeded this
    pub stockout_min_predicted: f64,
    /// Sales below `predicted * overstock_ratio` count as overstock
    pub overstock_ratio: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            stockout_min_predicted: 5.0,
            overstock_ratio: 0.5,
        }
    }
}

impl RiskThresholds {
    /// Zero recorded sales where the model expected material demand
    pub fn is_stockout(&self, observed: Option<f64>, predicted: f64) -> bool {
        observed == Some(0.0) && predicted > self.stockout_min_predicted
    }

    /// Positive sales that fell short of `overstock_ratio` of the forecast
    pub fn is_overstock(&self, observed: Option<f64>, predicted: f64) -> bool {
        match observed {
            Some(sales) => sales > 0.0 && sales < predicted * self.overstock_ratio,
            None => false,
        }
    }
}

/// `observed - predicted`, missing when either side is missing
pub fn residual(observed: Option<f64>, predicted: f64) -> Option<f64> {
    observed
        .map(|sales| sales - predicted)
        .filter(|r| !r.is_nan())
}

/// A forecast row aligned with its actual sales and promotion units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedObservation {
    pub date: NaiveDate,
    pub store_nbr: i64,
    pub family: String,
    pub predicted: f64,
    pub observed: Option<f64>,
    pub onpromotion: i64,
    pub residual: Option<f64>,
    pub stockout_flag: bool,
    pub overstock_flag: bool,
}

impl JoinedObservation {
    /// Build the joined row and derive its residual and flags
    pub fn derive(
        forecast: &ForecastRecord,
        observed: Option<f64>,
        onpromotion: i64,
        thresholds: &RiskThresholds,
    ) -> Self {
        let predicted = forecast.yhat;
        Self {
            date: forecast.date,
            store_nbr: forecast.store_nbr,
            family: forecast.family.clone(),
            predicted,
            observed,
            onpromotion,
            residual: residual(observed, predicted),
            stockout_flag: thresholds.is_stockout(observed, predicted),
            overstock_flag: thresholds.is_overstock(observed, predicted),
        }
    }

    pub fn recompute_residual(&mut self) {
        self.residual = residual(self.observed, self.predicted);
    }

    /// True when actual sales were found for this forecast row
    pub fn is_matched(&self) -> bool {
        self.observed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(0.0), 10.0, true)]
    #[case(Some(0.0), 5.0, false)]
    #[case(Some(0.0), 4.0, false)]
    #[case(Some(1.0), 10.0, false)]
    #[case(None, 10.0, false)]
    #[case(Some(0.0), f64::NAN, false)]
    fn test_stockout_flag(
        #[case] observed: Option<f64>,
        #[case] predicted: f64,
        #[case] expected: bool,
    ) {
        assert_eq!(
            RiskThresholds::default().is_stockout(observed, predicted),
            expected
        );
    }

    #[rstest]
    #[case(Some(4.0), 10.0, true)]
    #[case(Some(5.0), 10.0, false)]
    #[case(Some(0.0), 10.0, false)]
    #[case(Some(12.0), 10.0, false)]
    #[case(None, 10.0, false)]
    #[case(Some(1.0), f64::NAN, false)]
    fn test_overstock_flag(
        #[case] observed: Option<f64>,
        #[case] predicted: f64,
        #[case] expected: bool,
    ) {
        assert_eq!(
            RiskThresholds::default().is_overstock(observed, predicted),
            expected
        );
    }

    #[test]
    fn test_residual_propagates_missing() {
        assert_eq!(residual(Some(3.0), 10.0), Some(-7.0));
        assert_eq!(residual(None, 10.0), None);
        assert_eq!(residual(Some(3.0), f64::NAN), None);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = RiskThresholds {
            stockout_min_predicted: 1.0,
            overstock_ratio: 0.8,
        };
        assert!(thresholds.is_stockout(Some(0.0), 2.0));
        assert!(thresholds.is_overstock(Some(7.0), 10.0));
    }
}
