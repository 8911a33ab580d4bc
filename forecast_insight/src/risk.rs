//! Stockout risk matrix (family x store)

use crate::error::Result;
use crate::features::JoinedObservation;
use polars::prelude::*;
use sales_math::RunningMean;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

/// One cell of the risk matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskCell {
    pub family: String,
    pub store_nbr: i64,
    pub risk: f64,
}

/// Share of periods flagged as stockout, rows by family and columns by store.
/// Pairs with no observations hold 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMatrix {
    families: Vec<String>,
    stores: Vec<i64>,
    values: Vec<Vec<f64>>,
}

impl RiskMatrix {
    pub fn families(&self) -> &[String] {
        &self.families
    }

    pub fn stores(&self) -> &[i64] {
        &self.stores
    }

    /// Matrix rows in `families()` order, each in `stores()` order
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn get(&self, family: &str, store_nbr: i64) -> Option<f64> {
        let row = self.families.iter().position(|f| f == family)?;
        let col = self.stores.iter().position(|s| *s == store_nbr)?;
        Some(self.values[row][col])
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Iterate every cell, family-major
    pub fn cells(&self) -> impl Iterator<Item = RiskCell> + '_ {
        self.families
            .iter()
            .zip(&self.values)
            .flat_map(move |(family, row)| {
                self.stores.iter().zip(row).map(move |(store_nbr, risk)| RiskCell {
                    family: family.clone(),
                    store_nbr: *store_nbr,
                    risk: *risk,
                })
            })
    }

    /// The `n` riskiest non-zero cells, highest first
    pub fn hotspots(&self, n: usize) -> Vec<RiskCell> {
        let mut cells: Vec<RiskCell> = self.cells().filter(|cell| cell.risk > 0.0).collect();
        cells.sort_by(|a, b| b.risk.partial_cmp(&a.risk).unwrap_or(Ordering::Equal));
        cells.truncate(n);
        cells
    }

    /// A `family` column followed by one `store_<n>` column per store
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.stores.len() + 1);
        columns.push(Series::new(
            "family",
            self.families
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<&str>>(),
        ));
        for (col, store_nbr) in self.stores.iter().enumerate() {
            columns.push(Series::new(
                &store_column(*store_nbr),
                self.values.iter().map(|row| row[col]).collect::<Vec<f64>>(),
            ));
        }
        Ok(DataFrame::new(columns)?)
    }

    /// Write the matrix as CSV with the same layout as `to_dataframe`
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = vec!["family".to_string()];
        header.extend(self.stores.iter().map(|s| store_column(*s)));
        csv_writer.write_record(&header)?;

        for (family, row) in self.families.iter().zip(&self.values) {
            let mut record = vec![family.clone()];
            record.extend(row.iter().map(|risk| risk.to_string()));
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

fn store_column(store_nbr: i64) -> String {
    format!("store_{}", store_nbr)
}

/// Stockout frequency per (store, family) over the full joined set.
///
/// Rows without actual sales still count, with their flag resolved to false.
pub fn stockout_risk(observations: &[JoinedObservation]) -> RiskMatrix {
    let mut groups: BTreeMap<(&str, i64), RunningMean> = BTreeMap::new();
    let mut stores = BTreeSet::new();

    for row in observations {
        groups
            .entry((row.family.as_str(), row.store_nbr))
            .or_default()
            .update_flag(row.stockout_flag);
        stores.insert(row.store_nbr);
    }

    let families: BTreeSet<&str> = groups.keys().map(|(family, _)| *family).collect();
    let stores: Vec<i64> = stores.into_iter().collect();

    let values = families
        .iter()
        .map(|family| {
            stores
                .iter()
                .map(|store_nbr| {
                    groups
                        .get(&(*family, *store_nbr))
                        .and_then(RunningMean::value)
                        .unwrap_or(0.0)
                })
                .collect()
        })
        .collect();

    RiskMatrix {
        families: families.into_iter().map(str::to_string).collect(),
        stores,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ForecastRecord;
    use crate::features::RiskThresholds;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn observation(store_nbr: i64, family: &str, observed: Option<f64>) -> JoinedObservation {
        let forecast = ForecastRecord {
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            store_nbr,
            family: family.to_string(),
            yhat: 10.0,
        };
        JoinedObservation::derive(&forecast, observed, 0, &RiskThresholds::default())
    }

    fn sample() -> Vec<JoinedObservation> {
        vec![
            observation(1, "DAIRY", Some(0.0)),
            observation(1, "DAIRY", Some(7.0)),
            observation(1, "DAIRY", None),
            observation(1, "DAIRY", Some(0.0)),
            observation(2, "BEVERAGES", Some(0.0)),
            observation(3, "DAIRY", Some(9.0)),
        ]
    }

    #[test]
    fn test_risk_is_flag_frequency() {
        let matrix = stockout_risk(&sample());

        assert_eq!(matrix.families(), &["BEVERAGES".to_string(), "DAIRY".to_string()]);
        assert_eq!(matrix.stores(), &[1i64, 2, 3]);
        assert_relative_eq!(matrix.get("DAIRY", 1).unwrap(), 0.5);
        assert_relative_eq!(matrix.get("BEVERAGES", 2).unwrap(), 1.0);
        assert_relative_eq!(matrix.get("DAIRY", 3).unwrap(), 0.0);
    }

    #[test]
    fn test_absent_pairs_are_zero() {
        let matrix = stockout_risk(&sample());
        assert_eq!(matrix.get("BEVERAGES", 1), Some(0.0));
        assert_eq!(matrix.get("BEVERAGES", 3), Some(0.0));
        assert_eq!(matrix.get("PRODUCE", 1), None);
    }

    #[test]
    fn test_hotspots_are_ranked() {
        let hotspots = stockout_risk(&sample()).hotspots(5);
        assert_eq!(hotspots.len(), 2);
        assert_eq!(hotspots[0].family, "BEVERAGES");
        assert_eq!(hotspots[0].store_nbr, 2);
        assert_eq!(hotspots[1].family, "DAIRY");
        assert_eq!(hotspots[1].store_nbr, 1);
    }

    #[test]
    fn test_empty_input_gives_empty_matrix() {
        let matrix = stockout_risk(&[]);
        assert!(matrix.is_empty());
        assert!(matrix.rows().is_empty());
        assert_eq!(matrix.to_dataframe().unwrap().width(), 1);
    }

    #[test]
    fn test_to_dataframe_layout() {
        let df = stockout_risk(&sample()).to_dataframe().unwrap();
        assert_eq!(
            df.get_column_names(),
            vec!["family", "store_1", "store_2", "store_3"]
        );
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_write_csv() {
        let mut buffer = Vec::new();
        stockout_risk(&sample()).write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "family,store_1,store_2,store_3");
        assert_eq!(lines[1], "BEVERAGES,0,1,0");
        assert_eq!(lines[2], "DAIRY,0.5,0,0");
    }
}
