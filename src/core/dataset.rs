use crate::core::disposition::Disposition;
use crate::core::features::FeatureVector;
use std::collections::BTreeMap;

/// A feature vector paired with its catalogue disposition.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRecord {
    pub features: FeatureVector,
    pub disposition: Disposition,
}

impl LabeledRecord {
    pub fn new(features: FeatureVector, disposition: Disposition) -> Self {
        Self {
            features,
            disposition,
        }
    }
}

/// Cleaned, labeled records ready for training.
///
/// Produced by the preprocessor and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingDataset {
    records: Vec<LabeledRecord>,
}

impl TrainingDataset {
    pub fn new(records: Vec<LabeledRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[LabeledRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Row count per disposition label, keyed by the catalogue string.
    pub fn class_distribution(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.disposition.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
