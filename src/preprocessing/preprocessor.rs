use crate::core::features::{FEATURE_COUNT, FeatureId, TARGET_COLUMN};
use crate::core::{Disposition, TrainingDataset};
use crate::preprocessing::missing_values::{
    Imputation, PartialRecord, drop_incomplete_required, impute_optional_with_median,
    is_missing_token,
};
use crate::preprocessing::outliers::{OutlierFence, remove_outliers};
use crate::preprocessing::{DataIntegrityError, RawTable};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use strum::IntoEnumIterator;

/// Row counts and fitted statistics from one preprocessing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreprocessingSummary {
    pub loaded: usize,
    pub after_disposition_filter: usize,
    pub after_missing_values: usize,
    pub after_outlier_removal: usize,
    pub imputations: Vec<Imputation>,
    pub outlier_fences: Vec<OutlierFence>,
    pub class_distribution: BTreeMap<&'static str, usize>,
}

#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub dataset: TrainingDataset,
    pub summary: PreprocessingSummary,
}

/// Turns a raw KOI table into a [`TrainingDataset`].
///
/// Steps, in order: keep rows with a known disposition, narrow to the twelve
/// feature columns, drop rows missing a required feature, impute optional
/// features with their median, and remove IQR outliers feature by feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataPreprocessor;

impl DataPreprocessor {
    pub fn new() -> Self {
        Self
    }

    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Preprocessed, DataIntegrityError> {
        info!("Loading KOI dataset from {}", path.as_ref().display());
        let table = RawTable::read_path(path)?;
        self.process(&table)
    }

    pub fn process(&self, table: &RawTable) -> Result<Preprocessed, DataIntegrityError> {
        let loaded = table.len();
        info!("Loaded {loaded} records");

        let target = table.require_column(TARGET_COLUMN)?;
        let mut feature_columns = [0usize; FEATURE_COUNT];
        for id in FeatureId::iter() {
            feature_columns[id.index()] = table.require_column(id.column())?;
        }

        let mut labeled = Vec::new();
        for row in table.rows() {
            let Some(disposition) = Disposition::from_label(row.cell(target)) else {
                continue;
            };
            let mut values = [None; FEATURE_COUNT];
            for id in FeatureId::iter() {
                let cell = row.cell(feature_columns[id.index()]);
                values[id.index()] = parse_cell(cell).map_err(|_| DataIntegrityError::InvalidValue {
                    line: row.line,
                    column: id.column().to_string(),
                    value: cell.to_string(),
                })?;
            }
            labeled.push(PartialRecord {
                values,
                disposition,
            });
        }
        let after_disposition_filter = labeled.len();
        info!("After filtering dispositions: {after_disposition_filter} records");

        let complete_required = drop_incomplete_required(labeled);
        let (records, imputations) = impute_optional_with_median(complete_required)?;
        let after_missing_values = records.len();
        for imp in &imputations {
            info!(
                "Imputed {} missing {} value(s) with median {:.4}",
                imp.filled,
                imp.feature.column(),
                imp.median
            );
        }
        info!("After handling missing values: {after_missing_values} records");

        let (records, outlier_fences) = remove_outliers(records);
        let after_outlier_removal = records.len();
        info!("After outlier removal: {after_outlier_removal} records");

        let dataset = TrainingDataset::new(records);
        let class_distribution = dataset.class_distribution();
        for (label, count) in &class_distribution {
            info!("  {label}: {count}");
        }

        Ok(Preprocessed {
            dataset,
            summary: PreprocessingSummary {
                loaded,
                after_disposition_filter,
                after_missing_values,
                after_outlier_removal,
                imputations,
                outlier_fences,
                class_distribution,
            },
        })
    }
}

fn parse_cell(cell: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    if is_missing_token(cell) {
        return Ok(None);
    }
    cell.trim().parse::<f64>().map(Some)
}
