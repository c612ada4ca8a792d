//! Library crate exposing the home price estimator used by the binary
//! targets and the mobile bindings.
//!
//! Artifacts are loaded once into an [`Artifacts`] value which is then
//! borrowed by every call to [`estimate`].

pub mod app;
pub mod artifacts;
pub mod config;
pub mod encoder;
pub mod error;
pub mod form;
pub mod model;

pub use artifacts::{ArtifactPaths, Artifacts, ColumnSchema};
pub use config::{EstimatorConfig, FormConfig};
pub use encoder::{
    encode, estimate, get_estimated_price, round_price, Estimate, EstimateRequest, FeatureVector,
    LocationMatch,
};
pub use error::{EstimatorError, Result};
pub use model::{LinearRegression, Regressor};
