use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::artifacts::ArtifactPaths;
use crate::error::{EstimatorError, Result};

/// Runtime settings for the estimator. Every field has a default, so a
/// config file only needs the values it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub artifacts_dir: PathBuf,
    pub columns_file: String,
    pub model_file: String,
    pub form: FormConfig,
}

/// Bounds applied to user input before a request is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub min_sqft: f64,
    pub max_sqft: f64,
    pub max_rooms: u32,
    pub default_sqft: f64,
    pub default_bhk: u32,
    pub default_bath: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("./artifacts"),
            columns_file: "columns.json".to_string(),
            model_file: "banglore_home_prices_model.json".to_string(),
            form: FormConfig::default(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            min_sqft: 500.0,
            max_sqft: 10_000.0,
            max_rooms: 5,
            default_sqft: 2000.0,
            default_bhk: 2,
            default_bath: 2,
        }
    }
}

impl EstimatorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EstimatorError::load(path, e))?;
        serde_json::from_str(&content).map_err(|e| EstimatorError::load(path, e))
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::in_dir(&self.artifacts_dir, &self.columns_file, &self.model_file)
    }
}
