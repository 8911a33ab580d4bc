//! Terminal rendering of an [`InsightReport`]

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Row, Table};
use forecast_insight::{
    DisplayConfig, InsightReport, JoinedObservation, PromoLift, RiskCell, RiskMatrix,
    SelectionOptions, StoreRecord,
};
use std::fmt::Write;

fn new_table<T: Into<Row>>(header: T) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn number(value: f64) -> Cell {
    Cell::new(format!("{:.2}", value)).set_alignment(CellAlignment::Right)
}

fn optional(value: Option<f64>) -> Cell {
    match value {
        Some(v) => number(v),
        None => Cell::new("-").set_alignment(CellAlignment::Right),
    }
}

fn flag(set: bool) -> Cell {
    Cell::new(if set { "yes" } else { "" })
}

/// Forecast vs actual rows for the selection
pub fn observations_table(rows: &[JoinedObservation]) -> Table {
    let mut table = new_table(vec![
        "Date",
        "Forecast",
        "Actual",
        "Residual",
        "Promo units",
        "Stockout",
        "Overstock",
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.date.format("%Y-%m-%d")),
            number(row.predicted),
            optional(row.observed),
            optional(row.residual),
            Cell::new(row.onpromotion).set_alignment(CellAlignment::Right),
            flag(row.stockout_flag),
            flag(row.overstock_flag),
        ]);
    }
    table
}

pub fn promo_table(entries: &[PromoLift]) -> Table {
    let mut table = new_table(vec!["Product family", "Promoted", "Not promoted", "Lift"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.family),
            number(entry.promoted_mean),
            number(entry.non_promoted_mean),
            number(entry.promo_lift),
        ]);
    }
    table
}

pub fn hotspot_table(cells: &[RiskCell]) -> Table {
    let mut table = new_table(vec!["Product family", "Store", "Stockout risk"]);
    for cell in cells {
        table.add_row(vec![
            Cell::new(&cell.family),
            Cell::new(cell.store_nbr).set_alignment(CellAlignment::Right),
            number(cell.risk),
        ]);
    }
    table
}

/// Full heatmap grid, families down and stores across
pub fn risk_table(matrix: &RiskMatrix) -> Table {
    let mut header = vec!["Family".to_string()];
    header.extend(matrix.stores().iter().map(|s| s.to_string()));

    let mut table = new_table(header);
    for (family, row) in matrix.families().iter().zip(matrix.rows()) {
        let mut cells = vec![Cell::new(family)];
        cells.extend(row.iter().map(|risk| number(*risk)));
        table.add_row(cells);
    }
    table
}

/// The store / family choice lists
pub fn options_listing(options: &SelectionOptions) -> String {
    let stores: Vec<String> = options.stores.iter().map(|s| s.to_string()).collect();
    let mut out = String::new();
    let _ = writeln!(out, "Stores ({}): {}", stores.len(), stores.join(", "));
    let _ = writeln!(
        out,
        "Product families ({}): {}",
        options.families.len(),
        options.families.join(", ")
    );
    out
}

/// Render every section of the report
pub fn render_report(
    report: &InsightReport,
    store: Option<&StoreRecord>,
    display: &DisplayConfig,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = render_into(&mut out, report, store, display);
    out
}

fn render_into(
    out: &mut String,
    report: &InsightReport,
    store: Option<&StoreRecord>,
    display: &DisplayConfig,
) -> std::fmt::Result {
    writeln!(out, "Sales Forecast Dashboard - {}", report.selection)?;
    if let Some(store) = store {
        writeln!(
            out,
            "{}, {} | type {} | cluster {}",
            store.city, store.state, store.store_type, store.cluster
        )?;
    }

    writeln!(out)?;
    writeln!(out, "## Residual Explorer")?;
    if report.filtered.is_empty() {
        writeln!(out, "No forecast rows for {}", report.selection)?;
    } else {
        writeln!(out, "{}", observations_table(&report.filtered))?;
    }
    write!(out, "{}", report.accuracy)?;

    writeln!(out)?;
    writeln!(
        out,
        "## Top {} Product Families by Promotion Sales Lift",
        display.top_n
    )?;
    writeln!(out, "{}", promo_table(report.promo_lift.top(display.top_n)))?;

    writeln!(out)?;
    writeln!(out, "## Stockout Risk Hotspots")?;
    let hotspots = report.risk.hotspots(display.hotspots);
    if hotspots.is_empty() {
        writeln!(out, "No stockouts flagged")?;
    } else {
        writeln!(out, "{}", hotspot_table(&hotspots))?;
    }

    writeln!(out)?;
    writeln!(out, "## Stockout Risk Map")?;
    writeln!(out, "{}", risk_table(&report.risk))?;
    Ok(())
}
