//! # Store Sales
//!
//! Umbrella crate for the store sales workspace. It re-exports the member
//! crates so downstream code can depend on a single package.
//!
//! - [`sales_math`]: running means and forecast accuracy measures
//! - [`forecast_insight`]: loading, joining and aggregating the source tables
//! - [`insight_dashboard`]: the load-once dashboard shell and terminal rendering
//!
//! ## Example
//!
//! ```
//! use store_sales_workspace::forecast_insight::features::{residual, RiskThresholds};
//!
//! let thresholds = RiskThresholds::default();
//! assert!(thresholds.is_stockout(Some(0.0), 8.0));
//! assert_eq!(residual(Some(3.0), 5.0), Some(-2.0));
//! ```

pub use forecast_insight;
pub use insight_dashboard;
pub use sales_math;

pub use forecast_insight::{FeatureEngine, InsightConfig, InsightReport, Selection};
pub use insight_dashboard::Dashboard;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_reexports_engine() {
        let engine = FeatureEngine::default();
        assert_eq!(engine.thresholds().stockout_min_predicted, 5.0);
        assert_eq!(InsightConfig::default().display.top_n, 15);
    }

    #[test]
    fn test_facade_reexports_math() {
        let mut mean = sales_math::RunningMean::new();
        mean.update(Some(2.0));
        mean.update(None);
        mean.update(Some(4.0));
        assert_eq!(mean.value(), Some(3.0));
    }
}
