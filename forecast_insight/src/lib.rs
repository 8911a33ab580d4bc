//! # Forecast Insight
//!
//! Joins a sales-forecast output with observed sales and inventory/promotion
//! data, derives simple risk indicators and aggregates them for display.
//!
//! ## Features
//!
//! - Typed loading of the forecast, sales, store and inventory CSV tables
//! - Left join on (date, store, family) that never drops or duplicates forecast rows
//! - Residual, stockout and overstock indicators with explicit missing-value rules
//! - Store / family selection with the choice lists a UI would offer
//! - Promotion lift ranking per product family
//! - Stockout risk matrix (family x store)
//! - Forecast accuracy (MAE, RMSE, bias, RMSLE) for the selected rows
//! - DataFrame and CSV export of every view
//!
//! ## Quick Start
//!
//! ```no_run
//! use forecast_insight::{DataLoader, FeatureEngine, InsightConfig, SelectionOptions};
//!
//! let config = InsightConfig::load(None)?;
//! let tables = DataLoader::load_sources(&config.sources)?;
//!
//! let options = SelectionOptions::from_forecasts(&tables.forecasts);
//! let selection = options.default_selection().expect("forecast table is empty");
//!
//! let engine = FeatureEngine::new(config.thresholds);
//! let report = engine.evaluate(&tables, &selection);
//!
//! for family in report.promo_lift.top(config.display.top_n) {
//!     println!("{:<30} {:>10.2}", family.family, family.promo_lift);
//! }
//! println!("{}", report.accuracy);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod export;
pub mod features;
pub mod filter;
pub mod join;
pub mod metrics;
pub mod promo;
pub mod risk;

// Re-export commonly used types
pub use crate::config::{DisplayConfig, InsightConfig, SourcePaths};
pub use crate::data::{
    DataLoader, ForecastRecord, InventoryRecord, SalesRecord, SourceTables, StoreRecord,
};
pub use crate::engine::{FeatureEngine, InsightReport};
pub use crate::error::{ConfigError, InsightError};
pub use crate::features::{JoinedObservation, RiskThresholds};
pub use crate::filter::{filter_selection, Selection, SelectionOptions};
pub use crate::join::align_and_join;
pub use crate::metrics::AccuracySummary;
pub use crate::promo::{promotion_lift, PromoLift, PromoLiftRanking};
pub use crate::risk::{stockout_risk, RiskCell, RiskMatrix};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
