use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Failures raised while loading artifacts or serving an estimate.
///
/// The first three variants are fatal at startup; the rest are reported per
/// request and leave the loaded artifacts untouched.
#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("artifact file not found: {}", .path.display())]
    MissingArtifact { path: PathBuf },

    #[error("failed to load artifact {}: {reason}", .path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    #[error("model expects {expected} features but schema has {found} columns")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("prediction failed: {0}")]
    Prediction(String),
}

impl EstimatorError {
    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error should halt startup rather than a single request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingArtifact { .. } | Self::ArtifactLoad { .. } | Self::ShapeMismatch { .. }
        )
    }
}
