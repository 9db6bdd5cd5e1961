mod error;
mod feature_id;
mod feature_order;
mod feature_vector;

pub use error::ValidationError;
pub use feature_id::{FEATURE_COUNT, FeatureId, REQUIRED_FEATURE_COUNT, TARGET_COLUMN};
pub use feature_order::{FeatureOrder, FeatureOrderError};
pub use feature_vector::{FeatureVector, OPTIONAL_FEATURE_DEFAULT};

/// Feature values laid out in a [`FeatureOrder`].
pub type FeatureRow = [f64; FEATURE_COUNT];
