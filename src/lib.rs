pub mod artifacts;
pub mod classifiers;
pub mod core;
pub mod evaluation;
pub mod prediction;
pub mod preprocessing;
pub mod training;
pub mod transform;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use artifacts::{ArtifactBundle, ConfigurationError, ModelInfo};
pub use crate::core::features::{FeatureId, FeatureVector, ValidationError};
pub use crate::core::{Disposition, Verdict};
pub use prediction::{PredictError, PredictionResult, Predictor};
pub use preprocessing::{DataIntegrityError, DataPreprocessor};
pub use training::{ModelTrainer, TrainError, TrainingConfig};
