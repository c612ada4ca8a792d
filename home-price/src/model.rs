use std::path::Path;

use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{EstimatorError, Result};

/// A trained regression model that maps a batch of feature rows to one
/// output per row.
pub trait Regressor {
    /// Number of input features each row must carry.
    fn n_features(&self) -> usize;

    /// Predict one value per row of `rows` (shape `batch x n_features`).
    fn predict(&self, rows: ArrayView2<'_, f64>) -> Array1<f64>;
}

/// Ordinary least squares model exported as coefficients plus intercept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "LinearModelFile", into = "LinearModelFile")]
pub struct LinearRegression {
    coef: Array1<f64>,
    intercept: f64,
}

/// On-disk shape of the JSON model export.
#[derive(Serialize, Deserialize)]
struct LinearModelFile {
    coef: Vec<f64>,
    intercept: f64,
}

impl From<LinearModelFile> for LinearRegression {
    fn from(file: LinearModelFile) -> Self {
        Self::new(Array1::from(file.coef), file.intercept)
    }
}

impl From<LinearRegression> for LinearModelFile {
    fn from(model: LinearRegression) -> Self {
        Self {
            coef: model.coef.to_vec(),
            intercept: model.intercept,
        }
    }
}

impl LinearRegression {
    pub fn new(coef: Array1<f64>, intercept: f64) -> Self {
        Self { coef, intercept }
    }

    pub fn coef(&self) -> &Array1<f64> {
        &self.coef
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Whether every weight, intercept included, is a finite number.
    pub fn is_finite(&self) -> bool {
        self.intercept.is_finite() && self.coef.iter().all(|c| c.is_finite())
    }

    /// Deserialize the JSON export `{"coef": [...], "intercept": x}`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Read and deserialize a JSON model file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| EstimatorError::load(path, e))?;
        let model = Self::from_json(&text).map_err(|e| EstimatorError::load(path, e))?;
        if !model.is_finite() {
            return Err(EstimatorError::load(path, "model contains non-finite weights"));
        }
        Ok(model)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Regressor for LinearRegression {
    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Array1<f64> {
        rows.dot(&self.coef) + self.intercept
    }
}

impl<R: Regressor + ?Sized> Regressor for &R {
    fn n_features(&self) -> usize {
        (**self).n_features()
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Array1<f64> {
        (**self).predict(rows)
    }
}
