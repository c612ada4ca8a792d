//! Loading of the column schema and the trained model.
//!
//! Both files are read once at startup into an [`Artifacts`] value that the
//! caller owns and lends to every prediction.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;

use crate::error::{EstimatorError, Result};
use crate::model::{LinearRegression, Regressor};

/// Number of leading numeric columns: area, bath, bhk.
pub const NUMERIC_COLUMNS: usize = 3;

/// Ordered feature names defining the model's input layout.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSchema {
    columns: Vec<String>,
}

#[derive(Deserialize)]
struct ColumnsFile {
    data_columns: Vec<String>,
}

impl ColumnSchema {
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.len() < NUMERIC_COLUMNS {
            return Err(EstimatorError::InvalidInput(format!(
                "schema needs at least {NUMERIC_COLUMNS} columns, got {}",
                columns.len()
            )));
        }
        Ok(Self { columns })
    }

    /// Parse `{"data_columns": [...]}`.
    pub fn from_json(json: &str) -> std::result::Result<Self, String> {
        let file: ColumnsFile = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Self::new(file.data_columns).map_err(|e| e.to_string())
    }

    pub fn load(path: &Path) -> Result<Self> {
        ensure_exists(path)?;
        let text = std::fs::read_to_string(path).map_err(|e| EstimatorError::load(path, e))?;
        Self::from_json(&text).map_err(|reason| EstimatorError::load(path, reason))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Location names, i.e. every column after the numeric ones.
    pub fn locations(&self) -> &[String] {
        &self.columns[NUMERIC_COLUMNS..]
    }

    /// Schema position of a location column, matched case-insensitively.
    /// Numeric columns are never returned.
    pub fn location_index(&self, location: &str) -> Option<usize> {
        let wanted = location.to_lowercase();
        self.locations()
            .iter()
            .position(|c| *c == wanted)
            .map(|i| i + NUMERIC_COLUMNS)
    }
}

/// Where the artifact files live on disk.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtifactPaths {
    pub columns: PathBuf,
    pub model: PathBuf,
}

impl ArtifactPaths {
    pub fn new(columns: impl Into<PathBuf>, model: impl Into<PathBuf>) -> Self {
        Self {
            columns: columns.into(),
            model: model.into(),
        }
    }

    pub fn in_dir(dir: &Path, columns_file: &str, model_file: &str) -> Self {
        Self::new(dir.join(columns_file), dir.join(model_file))
    }
}

/// The loaded schema and model, immutable for the rest of the process.
#[derive(Clone, Debug)]
pub struct Artifacts<M = LinearRegression> {
    schema: ColumnSchema,
    model: M,
}

impl Artifacts<LinearRegression> {
    /// Load the schema and the JSON model. Missing files are reported
    /// before anything is parsed.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        info!("loading saved artifacts...");
        ensure_exists(&paths.columns)?;
        ensure_exists(&paths.model)?;

        let schema = ColumnSchema::load(&paths.columns)?;
        let model = LinearRegression::load(&paths.model)?;
        if let Err(e) = check_shape(&schema, &model) {
            return Err(EstimatorError::load(&paths.model, e));
        }
        let artifacts = Self { schema, model };

        info!(
            "loading saved artifacts...done ({} columns, {} locations)",
            artifacts.schema.len(),
            artifacts.locations().len()
        );
        Ok(artifacts)
    }
}

impl<M: Regressor> Artifacts<M> {
    /// Pair an already decoded schema and model, checking that the model
    /// expects exactly one input per schema column.
    pub fn from_parts(schema: ColumnSchema, model: M) -> Result<Self> {
        check_shape(&schema, &model)?;
        debug!("numeric columns: {:?}", &schema.columns()[..NUMERIC_COLUMNS]);
        Ok(Self { schema, model })
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn locations(&self) -> &[String] {
        self.schema.locations()
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

fn check_shape<M: Regressor>(schema: &ColumnSchema, model: &M) -> Result<()> {
    if model.n_features() == schema.len() {
        Ok(())
    } else {
        Err(EstimatorError::ShapeMismatch {
            expected: model.n_features(),
            found: schema.len(),
        })
    }
}

/// Fail with [`EstimatorError::MissingArtifact`] when `path` is absent.
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(EstimatorError::MissingArtifact {
            path: path.to_path_buf(),
        })
    }
}
