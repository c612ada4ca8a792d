use std::fs;
use std::path::Path;

use tempfile::TempDir;

pub const COLUMNS: &str =
    r#"{"data_columns": ["total_sqft", "bath", "bhk", "1st phase jp nagar", "indira nagar"]}"#;
pub const MODEL: &str = r#"{"coef": [0.05, 3.0, 2.0, 10.0, 40.0], "intercept": -12.34}"#;

/// Write a schema and model into a fresh temp directory.
pub fn artifacts_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "columns.json", COLUMNS);
    write(dir.path(), "banglore_home_prices_model.json", MODEL);
    dir
}

pub fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}
