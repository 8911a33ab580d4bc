use forecast_insight::{ConfigError, InsightError};
use std::io;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let insight_error = InsightError::from(io_error);
    assert!(matches!(insight_error, InsightError::IoError(_)));

    let csv_error = csv::Error::from(io::Error::new(io::ErrorKind::Other, "broken pipe"));
    let insight_error = InsightError::from(csv_error);
    assert!(matches!(insight_error, InsightError::CsvError(_)));
}

#[test]
fn test_error_display() {
    let error = InsightError::MissingColumn {
        table: "forecast",
        column: "yhat",
    };
    assert_eq!(error.to_string(), "Missing column 'yhat' in forecast table");

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = InsightError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));

    let error = ConfigError::ValidationError("display.top_n must be greater than zero".to_string());
    assert!(error.to_string().contains("display.top_n"));
}

#[test]
fn test_result_mapping() {
    let result: Result<(), &str> = Err("unparsable date");
    let mapped = result.map_err(|e| InsightError::DataError(e.to_string()));

    if let Err(InsightError::DataError(msg)) = mapped {
        assert_eq!(msg, "unparsable date");
    } else {
        panic!("Wrong error variant");
    }
}
