mod label_encoder;
mod standard_scaler;

pub use label_encoder::LabelEncoder;
pub use standard_scaler::StandardScaler;
