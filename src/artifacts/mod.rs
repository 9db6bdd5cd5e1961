mod bundle;
mod error;

pub use bundle::{
    ARTIFACT_FILES, ArtifactBundle, CLASSIFIER_FILE, ENCODER_FILE, FEATURE_NAMES_FILE,
    MANIFEST_FILE, Manifest, ModelInfo, SCALER_FILE,
};
pub use error::ConfigurationError;
