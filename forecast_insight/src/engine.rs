//! The data join and feature engine
//!
//! `FeatureEngine` holds nothing but thresholds. Every call to `evaluate`
//! recomputes all views from the source tables it is handed.

use crate::data::SourceTables;
use crate::features::{JoinedObservation, RiskThresholds};
use crate::filter::{filter_selection, Selection};
use crate::join::align_and_join;
use crate::metrics::AccuracySummary;
use crate::promo::{promotion_lift, PromoLiftRanking};
use crate::risk::{stockout_risk, RiskMatrix};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything derived for one selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub selection: Selection,
    /// Full joined set, one row per forecast row
    pub joined: Vec<JoinedObservation>,
    /// Joined rows for the selection only
    pub filtered: Vec<JoinedObservation>,
    /// Ranking over the full inventory table
    pub promo_lift: PromoLiftRanking,
    /// Risk over the full joined set
    pub risk: RiskMatrix,
    /// Accuracy of the filtered rows
    pub accuracy: AccuracySummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeatureEngine {
    thresholds: RiskThresholds,
}

impl FeatureEngine {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Join forecasts with actuals and promotions and derive flags
    pub fn join(&self, tables: &SourceTables) -> Vec<JoinedObservation> {
        align_and_join(
            &tables.forecasts,
            &tables.sales,
            &tables.inventory,
            &self.thresholds,
        )
    }

    /// Run join, filter and the three aggregations for `selection`
    pub fn evaluate(&self, tables: &SourceTables, selection: &Selection) -> InsightReport {
        let joined = self.join(tables);
        let filtered = filter_selection(&joined, selection);
        let promo_lift = promotion_lift(&tables.inventory);
        let risk = stockout_risk(&joined);
        let accuracy = AccuracySummary::from_observations(&filtered);

        debug!(
            %selection,
            joined = joined.len(),
            filtered = filtered.len(),
            families_ranked = promo_lift.len(),
            risk_rows = risk.families().len(),
            "evaluated selection"
        );

        InsightReport {
            selection: selection.clone(),
            joined,
            filtered,
            promo_lift,
            risk,
            accuracy,
        }
    }
}
