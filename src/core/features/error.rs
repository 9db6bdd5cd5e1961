use crate::core::features::FeatureId;
use thiserror::Error;

/// Rejection of a caller-supplied feature vector.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("required feature \"{0}\" is missing")]
    MissingFeature(FeatureId),

    #[error("feature \"{feature}\" is not a finite number: {value}")]
    NonNumeric { feature: FeatureId, value: String },

    #[error("feature input must be a JSON object")]
    NotAnObject,
}
