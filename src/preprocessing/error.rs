use crate::core::Disposition;
use crate::core::features::FeatureId;
use std::path::PathBuf;
use thiserror::Error;

/// Training data that cannot be turned into a usable dataset.
///
/// Always fatal: training stops instead of silently dropping more rows.
#[derive(Debug, Error)]
pub enum DataIntegrityError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input has no header line")]
    NoHeader,

    #[error("required column \"{0}\" is not present in the input")]
    MissingColumn(String),

    #[error("line {line}: column \"{column}\" holds non-numeric value \"{value}\"")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },

    #[error("optional feature \"{0}\" has no observed value to impute from")]
    NoObservedValues(FeatureId),

    #[error("no records left after preprocessing")]
    Empty,

    #[error(
        "class \"{disposition}\" has {count} record(s); at least {required} are needed for a stratified split"
    )]
    TooFewSamples {
        disposition: Disposition,
        count: usize,
        required: usize,
    },
}
