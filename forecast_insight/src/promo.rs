//! Promotion lift per product family

use crate::data::InventoryRecord;
use crate::error::Result;
use polars::prelude::*;
use sales_math::RunningMean;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Mean sales with and without promotion for one family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoLift {
    pub family: String,
    pub promoted_mean: f64,
    pub non_promoted_mean: f64,
    pub promo_lift: f64,
}

/// Families ranked by promotion lift, highest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromoLiftRanking {
    entries: Vec<PromoLift>,
}

impl PromoLiftRanking {
    pub fn entries(&self) -> &[PromoLift] {
        &self.entries
    }

    /// The `n` highest-lift families
    pub fn top(&self, n: usize) -> &[PromoLift] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn get(&self, family: &str) -> Option<&PromoLift> {
        self.entries.iter().find(|entry| entry.family == family)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Columns: `family`, `promoted_mean`, `non_promoted_mean`, `promo_lift`
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Series::new(
                "family",
                self.entries
                    .iter()
                    .map(|e| e.family.as_str())
                    .collect::<Vec<&str>>(),
            ),
            Series::new(
                "promoted_mean",
                self.entries
                    .iter()
                    .map(|e| e.promoted_mean)
                    .collect::<Vec<f64>>(),
            ),
            Series::new(
                "non_promoted_mean",
                self.entries
                    .iter()
                    .map(|e| e.non_promoted_mean)
                    .collect::<Vec<f64>>(),
            ),
            Series::new(
                "promo_lift",
                self.entries
                    .iter()
                    .map(|e| e.promo_lift)
                    .collect::<Vec<f64>>(),
            ),
        ])?;
        Ok(df)
    }
}

/// Rank families by `mean(sales | promoted) - mean(sales | not promoted)`.
///
/// Missing sales are skipped inside each group; a group with no defined sales
/// (or no rows at all) contributes a mean of 0. Families start in ascending
/// name order and the descending sort on lift is stable, so equal lifts keep
/// that order.
pub fn promotion_lift(inventory: &[InventoryRecord]) -> PromoLiftRanking {
    // [not promoted, promoted]
    let mut groups: BTreeMap<&str, [RunningMean; 2]> = BTreeMap::new();
    for row in inventory {
        let slot = groups.entry(row.family.as_str()).or_default();
        slot[usize::from(row.is_promoted())].update(row.sales);
    }

    let mut entries: Vec<PromoLift> = groups
        .into_iter()
        .map(|(family, [plain, promoted])| {
            let promoted_mean = promoted.value().unwrap_or(0.0);
            let non_promoted_mean = plain.value().unwrap_or(0.0);
            PromoLift {
                family: family.to_string(),
                promoted_mean,
                non_promoted_mean,
                promo_lift: promoted_mean - non_promoted_mean,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.promo_lift
            .partial_cmp(&a.promo_lift)
            .unwrap_or(Ordering::Equal)
    });

    PromoLiftRanking { entries }
}
