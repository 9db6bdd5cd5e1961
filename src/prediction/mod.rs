mod error;
mod predictor;
mod result;

pub use error::PredictError;
pub use predictor::Predictor;
pub use result::{ClassProbability, ConfidenceScores, PredictionResult, RawPrediction};
