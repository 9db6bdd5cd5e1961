use crate::core::features::FeatureOrderError;
use std::path::PathBuf;
use thiserror::Error;

/// Persisted model artifacts that are absent, unreadable or do not belong
/// together.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("artifact {0} does not exist")]
    MissingArtifact(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("feature order in {path} is invalid: {source}")]
    FeatureOrder {
        path: PathBuf,
        #[source]
        source: FeatureOrderError,
    },

    #[error("artifacts are inconsistent: {0}")]
    Inconsistent(String),
}

impl ConfigurationError {
    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigurationError::MissingArtifact(_))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigurationError::Io {
            path: path.into(),
            source,
        }
    }
}
