use std::path::PathBuf;
use thiserror::Error;

use crate::artifacts::ConfigurationError;
use crate::classifiers::FitError;
use crate::preprocessing::DataIntegrityError;

#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Data(#[from] DataIntegrityError),

    #[error(transparent)]
    Artifacts(#[from] ConfigurationError),

    #[error("model fitting failed: {0}")]
    Fit(#[from] FitError),

    #[error("invalid training configuration: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
