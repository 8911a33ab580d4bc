use forecast_insight::{DataLoader, InsightConfig, Selection, SourcePaths};
use insight_dashboard::{logging, render, Dashboard};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

fn write_sources(dir: &Path) -> SourcePaths {
    let write = |name: &str, lines: &[&str]| {
        let path = dir.join(name);
        std::fs::write(&path, lines.join("\n") + "\n").unwrap();
        path
    };

    SourcePaths {
        forecasts: write(
            "forecast.csv",
            &[
                "ds,store_nbr,family,yhat",
                "2023-01-01,1,BEVERAGES,10.0",
                "2023-01-02,1,BEVERAGES,8.0",
                "2023-01-01,2,DAIRY,6.0",
                "2023-01-02,2,DAIRY,4.0",
            ],
        ),
        sales: write(
            "train.csv",
            &[
                "id,date,store_nbr,family,sales,onpromotion",
                "0,2023-01-01,1,BEVERAGES,0,0",
                "1,2023-01-02,1,BEVERAGES,9.5,0",
                "2,2023-01-01,2,DAIRY,2.0,4",
            ],
        ),
        stores: write(
            "stores.csv",
            &[
                "store_nbr,city,state,type,cluster",
                "1,Quito,Pichincha,D,13",
                "2,Guayaquil,Guayas,A,5",
            ],
        ),
        inventory: write(
            "inventory.csv",
            &[
                "date,store_nbr,family,sales,onpromotion",
                "2023-01-01,1,BEVERAGES,0,0",
                "2023-01-02,1,BEVERAGES,9.5,0",
                "2023-01-01,2,DAIRY,2.0,4",
                "2023-01-02,2,DAIRY,1.0,0",
            ],
        ),
    }
}

fn dashboard(dir: &TempDir) -> Dashboard {
    let config = InsightConfig {
        sources: write_sources(dir.path()),
        ..InsightConfig::default()
    };
    Dashboard::open(config).unwrap()
}

#[test]
fn test_open_loads_every_table() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let dashboard = dashboard(&dir);

    assert_eq!(dashboard.tables().forecasts.len(), 4);
    assert_eq!(dashboard.tables().inventory.len(), 4);
    assert_eq!(dashboard.options().stores, vec![1, 2]);
    assert_eq!(dashboard.options().families, vec!["BEVERAGES", "DAIRY"]);
}

#[test]
fn test_open_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let mut sources = write_sources(dir.path());
    sources.sales = dir.path().join("missing.csv");
    let config = InsightConfig {
        sources,
        ..InsightConfig::default()
    };

    let err = Dashboard::open(config).unwrap_err();
    assert!(err.to_string().contains("failed to load source tables"));
}

#[test]
fn test_from_tables_matches_open() {
    let dir = TempDir::new().unwrap();
    let config = InsightConfig {
        sources: write_sources(dir.path()),
        ..InsightConfig::default()
    };
    let tables = DataLoader::load_sources(&config.sources).unwrap();

    let wrapped = Dashboard::from_tables(config.clone(), tables);
    let opened = Dashboard::open(config).unwrap();
    assert_eq!(wrapped.options(), opened.options());

    let selection = Selection::new(2, "DAIRY");
    assert_eq!(wrapped.render(&selection), opened.render(&selection));
}

#[test]
fn test_resolve_selection_defaults() {
    let dir = TempDir::new().unwrap();
    let dashboard = dashboard(&dir);

    assert_eq!(
        dashboard.resolve_selection(None, None).unwrap(),
        Selection::new(1, "BEVERAGES")
    );
    assert_eq!(
        dashboard.resolve_selection(Some(2), Some("DAIRY")).unwrap(),
        Selection::new(2, "DAIRY")
    );
    assert_eq!(
        dashboard.resolve_selection(None, Some("DAIRY")).unwrap(),
        Selection::new(1, "DAIRY")
    );
}

#[test]
fn test_resolve_selection_rejects_unknown_values() {
    let dir = TempDir::new().unwrap();
    let dashboard = dashboard(&dir);

    let err = dashboard.resolve_selection(Some(42), None).unwrap_err();
    assert!(err.to_string().contains("Store 42"));
    assert!(dashboard.resolve_selection(None, Some("PRODUCE")).is_err());
}

#[test]
fn test_render_report_sections() {
    let dir = TempDir::new().unwrap();
    let dashboard = dashboard(&dir);
    let selection = Selection::new(1, "BEVERAGES");
    let report = dashboard.render(&selection);

    assert_eq!(report.filtered.len(), 2);
    assert!(report.filtered[0].stockout_flag);

    let text = render::render_report(
        &report,
        dashboard.tables().store(1),
        &dashboard.config().display,
    );
    assert!(text.starts_with("Sales Forecast Dashboard - Store 1, BEVERAGES"));
    assert!(text.contains("Quito, Pichincha | type D | cluster 13"));
    assert!(text.contains("## Residual Explorer"));
    assert!(text.contains("## Top 15 Product Families by Promotion Sales Lift"));
    assert!(text.contains("## Stockout Risk Hotspots"));
    assert!(text.contains("## Stockout Risk Map"));
    assert!(!text.contains("No stockouts flagged"));
}

#[test]
fn test_render_report_without_rows() {
    let dir = TempDir::new().unwrap();
    let dashboard = dashboard(&dir);
    // Valid store and family that never occur together
    let selection = Selection::new(2, "BEVERAGES");
    let report = dashboard.render(&selection);

    let text = render::render_report(&report, None, &dashboard.config().display);
    assert!(text.contains("No forecast rows for Store 2, BEVERAGES"));
}

#[test]
fn test_options_listing() {
    let dir = TempDir::new().unwrap();
    let dashboard = dashboard(&dir);

    assert_eq!(
        render::options_listing(dashboard.options()),
        "Stores (2): 1, 2\nProduct families (2): BEVERAGES, DAIRY\n"
    );
}

#[test]
fn test_export_writes_every_view() {
    let dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let dashboard = dashboard(&dir);
    let report = dashboard.render(&Selection::new(1, "BEVERAGES"));

    let target = out.path().join("views");
    let written = dashboard.export(&report, &target).unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "observations.csv",
            "joined.csv",
            "promo_lift.csv",
            "stockout_risk.csv"
        ]
    );
    for path in &written {
        assert!(path.exists());
    }

    let observations = std::fs::read_to_string(&written[0]).unwrap();
    assert_eq!(observations.lines().count(), 3);
    let joined = std::fs::read_to_string(&written[1]).unwrap();
    assert_eq!(joined.lines().count(), 5);
    let risk = std::fs::read_to_string(&written[3]).unwrap();
    assert!(risk.starts_with("family,store_1,store_2"));
}

#[test]
fn test_top_n_override_reaches_report() {
    let dir = TempDir::new().unwrap();
    let config = InsightConfig {
        sources: write_sources(dir.path()),
        ..InsightConfig::default()
    }
    .with_top_n(Some(1))
    .unwrap();
    let dashboard = Dashboard::open(config).unwrap();

    let report = dashboard.render(&Selection::new(2, "DAIRY"));
    let text = render::render_report(&report, None, &dashboard.config().display);
    assert!(text.contains("## Top 1 Product Families by Promotion Sales Lift"));
    let shown = report.promo_lift.top(dashboard.config().display.top_n);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].family, "DAIRY");
}

#[test]
fn test_zero_top_n_is_rejected() {
    let err = InsightConfig::default().with_top_n(Some(0)).unwrap_err();
    assert!(err.to_string().contains("display.top_n"));
}
