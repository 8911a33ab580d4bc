//! Group aggregation helpers
//!
//! `RunningMean` accumulates one group's values and skips missing entries,
//! so a group containing only missing values has no mean at all.

use serde::{Deserialize, Serialize};

fn is_present(value: f64) -> bool {
    !value.is_nan()
}

/// Incremental mean over the non-missing values of a group
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningMean {
    sum: f64,
    count: usize,
}

impl RunningMean {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value; missing values are ignored
    pub fn update(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| is_present(*v)) {
            self.sum += v;
            self.count += 1;
        }
    }

    /// Add a boolean observation as 1.0 / 0.0
    pub fn update_flag(&mut self, flag: bool) {
        self.update(Some(if flag { 1.0 } else { 0.0 }));
    }

    /// Current mean, `None` until a defined value has been seen
    pub fn value(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}
