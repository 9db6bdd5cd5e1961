mod config;
mod error;
mod split;
mod trainer;

pub use config::TrainingConfig;
pub use error::TrainError;
pub use split::{TrainTestSplit, stratified_split};
pub use trainer::{
    CONFUSION_MATRIX_FILE, FEATURE_IMPORTANCE_FILE, ModelTrainer, TRAINING_REPORT_FILE,
    TrainedModel, TrainingReport, ensure_splittable, write_diagnostics,
};
