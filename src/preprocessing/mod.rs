mod error;
pub mod missing_values;
pub mod outliers;
mod preprocessor;
mod raw_table;

pub use error::DataIntegrityError;
pub use preprocessor::{DataPreprocessor, Preprocessed, PreprocessingSummary};
pub use raw_table::{RawRow, RawTable};
