pub mod dataset;
pub mod disposition;
pub mod features;

pub use dataset::{LabeledRecord, TrainingDataset};
pub use disposition::{Disposition, Verdict};
