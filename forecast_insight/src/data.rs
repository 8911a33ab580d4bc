//! Source tables and CSV loading
//!
//! Each source file is read into a polars `DataFrame` and then pulled into
//! typed records. Required columns are checked up front so a malformed file
//! fails with the table and column name instead of somewhere in the join.

use crate::config::SourcePaths;
use crate::error::{InsightError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Rows sampled by polars when inferring column types
const INFER_SCHEMA_ROWS: usize = 1000;

/// Join key shared by forecasts, sales and inventory: (date, store, family)
pub type JoinKey<'a> = (NaiveDate, i64, &'a str);

/// Records that can be aligned on the (date, store, family) key
pub trait Keyed {
    fn key(&self) -> JoinKey<'_>;
}

/// One model prediction for a date/store/family combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub date: NaiveDate,
    pub store_nbr: i64,
    pub family: String,
    /// Predicted quantity; NaN when the source cell was empty
    pub yhat: f64,
}

/// Observed sales for a date/store/family combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub store_nbr: i64,
    pub family: String,
    pub sales: Option<f64>,
}

/// Store reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub store_nbr: i64,
    pub city: String,
    pub state: String,
    pub store_type: String,
    pub cluster: i64,
}

/// Inventory snapshot with promotion units on offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub date: NaiveDate,
    pub store_nbr: i64,
    pub family: String,
    pub sales: Option<f64>,
    pub onpromotion: Option<f64>,
}

impl InventoryRecord {
    /// True when any units were on promotion; missing counts as not promoted
    pub fn is_promoted(&self) -> bool {
        self.onpromotion.map_or(false, |units| units > 0.0)
    }
}

impl Keyed for ForecastRecord {
    fn key(&self) -> JoinKey<'_> {
        (self.date, self.store_nbr, &self.family)
    }
}

impl Keyed for SalesRecord {
    fn key(&self) -> JoinKey<'_> {
        (self.date, self.store_nbr, &self.family)
    }
}

impl Keyed for InventoryRecord {
    fn key(&self) -> JoinKey<'_> {
        (self.date, self.store_nbr, &self.family)
    }
}

/// The four source tables the engine works from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTables {
    pub forecasts: Vec<ForecastRecord>,
    pub sales: Vec<SalesRecord>,
    pub stores: Vec<StoreRecord>,
    pub inventory: Vec<InventoryRecord>,
}

impl SourceTables {
    /// Look up the reference data for a store
    pub fn store(&self, store_nbr: i64) -> Option<&StoreRecord> {
        self.stores.iter().find(|s| s.store_nbr == store_nbr)
    }
}

/// Loader for the CSV source tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Read a CSV file with a header row into a DataFrame
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(Some(INFER_SCHEMA_ROWS))
            .has_header(true)
            .finish()?;
        Ok(df)
    }

    /// Load all four source tables, stopping at the first failure
    pub fn load_sources(paths: &SourcePaths) -> Result<SourceTables> {
        let tables = SourceTables {
            forecasts: Self::forecasts(&paths.forecasts)?,
            sales: Self::sales(&paths.sales)?,
            stores: Self::stores(&paths.stores)?,
            inventory: Self::inventory(&paths.inventory)?,
        };

        info!(
            forecasts = tables.forecasts.len(),
            sales = tables.sales.len(),
            stores = tables.stores.len(),
            inventory = tables.inventory.len(),
            "loaded source tables"
        );
        Ok(tables)
    }

    /// Load forecast output (`ds`, `store_nbr`, `family`, `yhat`)
    pub fn forecasts<P: AsRef<Path>>(path: P) -> Result<Vec<ForecastRecord>> {
        Self::forecasts_from_dataframe(&Self::read_csv(path)?)
    }

    /// Load observed sales (`date`, `store_nbr`, `family`, `sales`)
    pub fn sales<P: AsRef<Path>>(path: P) -> Result<Vec<SalesRecord>> {
        Self::sales_from_dataframe(&Self::read_csv(path)?)
    }

    /// Load store metadata (`store_nbr`, `city`, `state`, `type`, `cluster`)
    pub fn stores<P: AsRef<Path>>(path: P) -> Result<Vec<StoreRecord>> {
        Self::stores_from_dataframe(&Self::read_csv(path)?)
    }

    /// Load inventory data (`ds` or `date`, `store_nbr`, `family`, `sales`, `onpromotion`)
    pub fn inventory<P: AsRef<Path>>(path: P) -> Result<Vec<InventoryRecord>> {
        Self::inventory_from_dataframe(&Self::read_csv(path)?)
    }

    pub fn forecasts_from_dataframe(df: &DataFrame) -> Result<Vec<ForecastRecord>> {
        const TABLE: &str = "forecast";
        let dates = date_column(df, TABLE, "ds")?;
        let stores = key_column(df, TABLE, "store_nbr")?;
        let families = text_column(df, TABLE, "family")?;
        let yhat = float_column(df, TABLE, "yhat")?;

        Ok(dates
            .into_iter()
            .zip(stores)
            .zip(families)
            .zip(yhat)
            .map(|(((date, store_nbr), family), yhat)| ForecastRecord {
                date,
                store_nbr,
                family,
                yhat: yhat.unwrap_or(f64::NAN),
            })
            .collect())
    }

    /// The sales date column is aligned to the forecast date key here;
    /// `date` is expected, `ds` is accepted when already renamed.
    pub fn sales_from_dataframe(df: &DataFrame) -> Result<Vec<SalesRecord>> {
        const TABLE: &str = "sales";
        let dates = date_column(df, TABLE, pick_column(df, "date", "ds"))?;
        let stores = key_column(df, TABLE, "store_nbr")?;
        let families = text_column(df, TABLE, "family")?;
        let sales = float_column(df, TABLE, "sales")?;

        Ok(dates
            .into_iter()
            .zip(stores)
            .zip(families)
            .zip(sales)
            .map(|(((date, store_nbr), family), sales)| SalesRecord {
                date,
                store_nbr,
                family,
                sales,
            })
            .collect())
    }

    pub fn stores_from_dataframe(df: &DataFrame) -> Result<Vec<StoreRecord>> {
        const TABLE: &str = "stores";
        let stores = key_column(df, TABLE, "store_nbr")?;
        let cities = text_column(df, TABLE, "city")?;
        let states = text_column(df, TABLE, "state")?;
        let types = text_column(df, TABLE, "type")?;
        let clusters = key_column(df, TABLE, "cluster")?;

        Ok(stores
            .into_iter()
            .zip(cities)
            .zip(states)
            .zip(types)
            .zip(clusters)
            .map(
                |((((store_nbr, city), state), store_type), cluster)| StoreRecord {
                    store_nbr,
                    city,
                    state,
                    store_type,
                    cluster,
                },
            )
            .collect())
    }

    /// Inventory files carry either a `ds` column or a raw `date` column.
    pub fn inventory_from_dataframe(df: &DataFrame) -> Result<Vec<InventoryRecord>> {
        const TABLE: &str = "inventory";
        let dates = date_column(df, TABLE, pick_column(df, "ds", "date"))?;
        let stores = key_column(df, TABLE, "store_nbr")?;
        let families = text_column(df, TABLE, "family")?;
        let sales = float_column(df, TABLE, "sales")?;
        let promotions = float_column(df, TABLE, "onpromotion")?;

        Ok(dates
            .into_iter()
            .zip(stores)
            .zip(families)
            .zip(sales)
            .zip(promotions)
            .map(
                |((((date, store_nbr), family), sales), onpromotion)| InventoryRecord {
                    date,
                    store_nbr,
                    family,
                    sales,
                    onpromotion,
                },
            )
            .collect())
    }
}

/// Prefer `primary` when present, otherwise fall back; the fallback is what
/// gets reported if neither exists.
fn pick_column(df: &DataFrame, primary: &'static str, fallback: &'static str) -> &'static str {
    if df.get_column_names().contains(&primary) {
        primary
    } else {
        fallback
    }
}

fn require<'a>(
    df: &'a DataFrame,
    table: &'static str,
    column: &'static str,
) -> Result<&'a Series> {
    df.column(column)
        .map_err(|_| InsightError::MissingColumn { table, column })
}

/// Numeric column with nulls and NaN both mapped to `None`
fn float_column(
    df: &DataFrame,
    table: &'static str,
    column: &'static str,
) -> Result<Vec<Option<f64>>> {
    let series = require(df, table, column)?.cast(&DataType::Float64)?;
    let values = series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Integer key column; nulls are rejected since they cannot be joined on
fn key_column(df: &DataFrame, table: &'static str, column: &'static str) -> Result<Vec<i64>> {
    let series = require(df, table, column)?.cast(&DataType::Int64)?;
    let values = series.i64()?;
    values
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.ok_or_else(|| null_value(table, column, row)))
        .collect()
}

fn text_column(df: &DataFrame, table: &'static str, column: &'static str) -> Result<Vec<String>> {
    let series = require(df, table, column)?.cast(&DataType::Utf8)?;
    let values = series.utf8()?;
    values
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.map(str::to_string)
                .ok_or_else(|| null_value(table, column, row))
        })
        .collect()
}

fn date_column(
    df: &DataFrame,
    table: &'static str,
    column: &'static str,
) -> Result<Vec<NaiveDate>> {
    text_column(df, table, column)?
        .iter()
        .enumerate()
        .map(|(row, raw)| {
            parse_date(raw).ok_or_else(|| {
                InsightError::DataError(format!(
                    "Unparsable date '{}' in {} table, column '{}', row {}",
                    raw, table, column, row
                ))
            })
        })
        .collect()
}

fn null_value(table: &str, column: &str, row: usize) -> InsightError {
    InsightError::DataError(format!(
        "Missing value in {} table, column '{}', row {}",
        table, column, row
    ))
}

/// Parse `YYYY-MM-DD`, ignoring any time-of-day suffix
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
