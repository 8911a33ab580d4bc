//! Align forecast rows with actual sales and promotion units

use crate::data::{ForecastRecord, InventoryRecord, JoinKey, Keyed, SalesRecord};
use crate::features::{JoinedObservation, RiskThresholds};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Left join of forecasts onto sales and then onto inventory promotions.
///
/// Every forecast row yields exactly one joined row, in forecast order.
/// Where the right side holds the same key more than once the first row wins.
pub fn align_and_join(
    forecasts: &[ForecastRecord],
    sales: &[SalesRecord],
    inventory: &[InventoryRecord],
    thresholds: &RiskThresholds,
) -> Vec<JoinedObservation> {
    let actuals = index_first(sales, "sales", |row| row.sales);
    let promotions = index_first(inventory, "inventory", |row| row.onpromotion);

    let joined: Vec<JoinedObservation> = forecasts
        .iter()
        .map(|forecast| {
            let key = forecast.key();
            let observed = actuals.get(&key).copied().flatten();
            let onpromotion = promotions
                .get(&key)
                .copied()
                .flatten()
                .map_or(0, promotion_units);
            JoinedObservation::derive(forecast, observed, onpromotion, thresholds)
        })
        .collect();

    debug!(
        rows = joined.len(),
        matched = joined.iter().filter(|row| row.is_matched()).count(),
        "joined forecasts with actuals and promotions"
    );
    joined
}

/// Promotion units as a whole count, truncated toward zero
fn promotion_units(units: f64) -> i64 {
    units as i64
}

fn index_first<'a, T: Keyed>(
    rows: &'a [T],
    table: &'static str,
    value: impl Fn(&T) -> Option<f64>,
) -> HashMap<JoinKey<'a>, Option<f64>> {
    let mut index = HashMap::with_capacity(rows.len());
    let mut duplicates = 0usize;

    for row in rows {
        match index.entry(row.key()) {
            Entry::Occupied(_) => duplicates += 1,
            Entry::Vacant(slot) => {
                slot.insert(value(row));
            }
        }
    }

    if duplicates > 0 {
        warn!(table, duplicates, "duplicate join keys, keeping the first match");
    }
    index
}
