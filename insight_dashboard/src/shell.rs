//! Load-once dashboard state

use anyhow::{anyhow, bail, Context, Result};
use forecast_insight::export::write_csv;
use forecast_insight::{
    DataLoader, FeatureEngine, InsightConfig, InsightReport, Selection, SelectionOptions,
    SourceTables,
};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Holds the source tables for the lifetime of the process.
///
/// Tables are read once in [`Dashboard::open`]; each [`Dashboard::render`]
/// recomputes every view from them.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: InsightConfig,
    tables: SourceTables,
    options: SelectionOptions,
    engine: FeatureEngine,
}

impl Dashboard {
    /// Load the source tables named in the configuration
    pub fn open(config: InsightConfig) -> Result<Self> {
        let tables = DataLoader::load_sources(&config.sources).with_context(|| {
            format!(
                "failed to load source tables (forecasts: {})",
                config.sources.forecasts.display()
            )
        })?;
        Ok(Self::from_tables(config, tables))
    }

    /// Wrap tables that were loaded elsewhere
    pub fn from_tables(config: InsightConfig, tables: SourceTables) -> Self {
        let options = SelectionOptions::from_forecasts(&tables.forecasts);
        let engine = FeatureEngine::new(config.thresholds);
        Self {
            config,
            tables,
            options,
            engine,
        }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    pub fn tables(&self) -> &SourceTables {
        &self.tables
    }

    /// Stores and families offered for selection
    pub fn options(&self) -> &SelectionOptions {
        &self.options
    }

    /// Fill unset parts from the default selection and reject values the
    /// forecast table does not contain
    pub fn resolve_selection(
        &self,
        store: Option<i64>,
        family: Option<&str>,
    ) -> Result<Selection> {
        let default = self
            .options
            .default_selection()
            .ok_or_else(|| anyhow!("the forecast table has no rows to select from"))?;

        let selection = Selection::new(
            store.unwrap_or(default.store_nbr),
            family.map_or(default.family, str::to_string),
        );
        if !self.options.contains(&selection) {
            bail!("{} is not present in the forecast table", selection);
        }
        Ok(selection)
    }

    /// Recompute every view for `selection`
    pub fn render(&self, selection: &Selection) -> InsightReport {
        debug!(%selection, "rendering selection");
        self.engine.evaluate(&self.tables, selection)
    }

    /// Write the report's views as CSV files into `dir`
    pub fn export(&self, report: &InsightReport, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create export directory {}", dir.display()))?;

        let observations = dir.join("observations.csv");
        write_csv(create(&observations)?, &report.filtered)?;

        let joined = dir.join("joined.csv");
        write_csv(create(&joined)?, &report.joined)?;

        let promo_lift = dir.join("promo_lift.csv");
        write_csv(create(&promo_lift)?, report.promo_lift.entries())?;

        let risk = dir.join("stockout_risk.csv");
        report.risk.write_csv(create(&risk)?)?;

        info!(
            dir = %dir.display(),
            rows = report.filtered.len(),
            "exported dashboard views"
        );
        Ok(vec![observations, joined, promo_lift, risk])
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
