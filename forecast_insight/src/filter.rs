//! Store / product-family selection

use crate::data::ForecastRecord;
use crate::features::JoinedObservation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The (store, family) pair a viewer is looking at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub store_nbr: i64,
    pub family: String,
}

impl Selection {
    pub fn new(store_nbr: i64, family: impl Into<String>) -> Self {
        Self {
            store_nbr,
            family: family.into(),
        }
    }

    /// Both equality predicates hold for the row
    pub fn matches(&self, row: &JoinedObservation) -> bool {
        row.store_nbr == self.store_nbr && row.family == self.family
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Store {}, {}", self.store_nbr, self.family)
    }
}

/// Rows for one selection, residual recomputed. No match gives an empty vec.
pub fn filter_selection(
    observations: &[JoinedObservation],
    selection: &Selection,
) -> Vec<JoinedObservation> {
    observations
        .iter()
        .filter(|row| selection.matches(row))
        .cloned()
        .map(|mut row| {
            row.recompute_residual();
            row
        })
        .collect()
}

/// Sorted distinct stores and families present in the forecast table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOptions {
    pub stores: Vec<i64>,
    pub families: Vec<String>,
}

impl SelectionOptions {
    pub fn from_forecasts(forecasts: &[ForecastRecord]) -> Self {
        let stores: BTreeSet<i64> = forecasts.iter().map(|row| row.store_nbr).collect();
        let families: BTreeSet<&str> = forecasts.iter().map(|row| row.family.as_str()).collect();

        Self {
            stores: stores.into_iter().collect(),
            families: families.into_iter().map(str::to_string).collect(),
        }
    }

    /// First store and first family, the initial state of both pickers
    pub fn default_selection(&self) -> Option<Selection> {
        let store_nbr = *self.stores.first()?;
        let family = self.families.first()?;
        Some(Selection::new(store_nbr, family.as_str()))
    }

    pub fn contains(&self, selection: &Selection) -> bool {
        self.stores.binary_search(&selection.store_nbr).is_ok()
            && self
                .families
                .binary_search_by(|f| f.as_str().cmp(selection.family.as_str()))
                .is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty() || self.families.is_empty()
    }
}
