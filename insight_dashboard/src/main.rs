use anyhow::{Context, Result};
use clap::Parser;
use forecast_insight::InsightConfig;
use insight_dashboard::{logging, render, Dashboard};
use std::path::PathBuf;
use tracing::info;

/// Forecast residuals, promotion lift and stockout risk for one store and product family.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file (source paths, thresholds, display settings).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Store number to inspect; defaults to the lowest store in the forecast table.
    #[arg(long)]
    store: Option<i64>,

    /// Product family to inspect (e.g. "BEVERAGES"); defaults to the first family.
    #[arg(long)]
    family: Option<String>,

    /// Number of families in the promotion-lift ranking.
    #[arg(long)]
    top_n: Option<usize>,

    /// Write the views as CSV files into this directory.
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Print the available stores and families and exit.
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let config = InsightConfig::load(cli.config.as_deref())
        .and_then(|config| config.with_top_n(cli.top_n))
        .context("failed to load configuration")?;

    let dashboard = Dashboard::open(config)?;

    if cli.list {
        print!("{}", render::options_listing(dashboard.options()));
        return Ok(());
    }

    let selection = dashboard.resolve_selection(cli.store, cli.family.as_deref())?;
    let report = dashboard.render(&selection);
    println!(
        "{}",
        render::render_report(
            &report,
            dashboard.tables().store(selection.store_nbr),
            &dashboard.config().display,
        )
    );

    if let Some(dir) = cli.export_dir {
        for path in dashboard.export(&report, &dir)? {
            info!(path = %path.display(), "wrote export");
        }
    }

    Ok(())
}
