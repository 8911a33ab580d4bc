//! # Insight Dashboard
//!
//! Application shell around [`forecast_insight`]: loads the source tables
//! once, re-runs the stateless engine for every selection and renders the
//! results as terminal tables or CSV exports.

pub mod logging;
pub mod render;
pub mod shell;

pub use shell::Dashboard;
