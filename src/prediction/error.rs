use crate::core::features::ValidationError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
    #[error("model is not loaded; train a model or check the model directory")]
    ModelNotLoaded,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
