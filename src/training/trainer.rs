use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::artifacts::ArtifactBundle;
use crate::classifiers::{Classifier, RandomForest};
use crate::core::features::{FeatureOrder, FeatureRow};
use crate::core::{Disposition, TrainingDataset};
use crate::evaluation::{
    ClassificationReport, ConfusionMatrix, CrossValidationScores, PerformanceEvaluator,
    PerformanceEvaluatorExt, RankedFeature, cross_validate, importances_to_csv, rank_features,
};
use crate::preprocessing::{DataIntegrityError, PreprocessingSummary};
use crate::training::{TrainError, TrainingConfig, stratified_split};
use crate::transform::{LabelEncoder, StandardScaler};

pub const FEATURE_IMPORTANCE_FILE: &str = "feature_importance.csv";
pub const CONFUSION_MATRIX_FILE: &str = "confusion_matrix.csv";
pub const TRAINING_REPORT_FILE: &str = "training_report.json";

/// Every class needs a row on each side of the split.
const MIN_ROWS_PER_CLASS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub trained_at: DateTime<Utc>,
    /// Run id of the saved artifacts this report describes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    pub config: TrainingConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preprocessing: Option<PreprocessingSummary>,
    pub train_size: usize,
    pub test_size: usize,
    pub test_accuracy: f64,
    pub kappa: f64,
    pub cross_validation: CrossValidationScores,
    pub class_labels: Vec<&'static str>,
    pub classification_report: ClassificationReport,
    pub confusion_matrix: ConfusionMatrix,
    pub feature_importances: Vec<RankedFeature>,
}

#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub bundle: ArtifactBundle,
    pub report: TrainingReport,
}

/// Fits the scaler, label encoder and forest, and evaluates the result on a
/// held-out stratified partition.
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainingConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn train(&self, dataset: &TrainingDataset) -> Result<TrainedModel, TrainError> {
        self.config.validate()?;
        ensure_splittable(dataset)?;

        let encoder = LabelEncoder::fit(dataset.records().iter().map(|r| r.disposition));
        let labels: Vec<usize> = dataset
            .records()
            .iter()
            .map(|r| encoder.encode(r.disposition).unwrap_or_default())
            .collect();
        let feature_order = FeatureOrder::canonical();
        let rows: Vec<FeatureRow> = dataset
            .records()
            .iter()
            .map(|r| r.features.ordered(&feature_order))
            .collect();

        let split = stratified_split(
            &labels,
            encoder.len(),
            self.config.test_fraction,
            self.config.seed,
        );
        info!(
            "Training set: {} samples, test set: {} samples",
            split.train.len(),
            split.test.len()
        );

        let pick = |idx: &[usize]| -> (Vec<FeatureRow>, Vec<usize>) {
            idx.iter().map(|&i| (rows[i], labels[i])).unzip()
        };
        let (train_rows, train_labels) = pick(&split.train);
        let (test_rows, test_labels) = pick(&split.test);

        let scaler = StandardScaler::fit(&train_rows);
        let train_scaled = scaler.transform_all(&train_rows);
        let test_scaled = scaler.transform_all(&test_rows);

        info!(
            "Fitting random forest with {} trees",
            self.config.forest.n_trees
        );
        let classifier =
            RandomForest::fit(&train_scaled, &train_labels, encoder.len(), &self.config.forest)?;

        let mut confusion = ConfusionMatrix::new(encoder.len());
        for (row, &label) in test_scaled.iter().zip(&test_labels) {
            confusion.add_result(label, &classifier.get_votes_for_instance(row));
        }
        let test_accuracy = confusion.accuracy();
        let kappa = confusion.metric("kappa").unwrap_or(f64::NAN);
        info!("Test accuracy: {test_accuracy:.4} (kappa {kappa:.4})");

        let cross_validation = cross_validate(
            &train_scaled,
            &train_labels,
            encoder.len(),
            self.config.cv_folds,
            &self.config.forest,
            self.config.seed,
        )?;
        info!("Cross-validation accuracy: {}", cross_validation.summary());

        let class_labels: Vec<&'static str> =
            encoder.classes().iter().map(|d| d.as_str()).collect();
        let classification_report = ClassificationReport::from_confusion(&confusion, &class_labels);
        info!("Classification report:\n{classification_report}");

        let feature_importances = rank_features(&feature_order, classifier.feature_importances());
        for (rank, f) in feature_importances.iter().take(5).enumerate() {
            info!("  {}. {}: {:.4}", rank + 1, f.column, f.importance);
        }

        let report = TrainingReport {
            trained_at: Utc::now(),
            run_id: None,
            config: self.config.clone(),
            preprocessing: None,
            train_size: split.train.len(),
            test_size: split.test.len(),
            test_accuracy,
            kappa,
            cross_validation,
            class_labels,
            classification_report,
            confusion_matrix: confusion,
            feature_importances,
        };
        let bundle = ArtifactBundle::new(classifier, scaler, encoder, feature_order)?;
        Ok(TrainedModel { bundle, report })
    }

    /// Trains, then persists the artifact bundle and the diagnostics into
    /// `model_dir`.
    pub fn train_and_save(
        &self,
        dataset: &TrainingDataset,
        preprocessing: Option<PreprocessingSummary>,
        model_dir: &Path,
    ) -> Result<TrainedModel, TrainError> {
        let mut trained = self.train(dataset)?;
        trained.report.preprocessing = preprocessing;
        let manifest = trained.bundle.save(model_dir)?;
        trained.report.run_id = Some(manifest.run_id);
        write_diagnostics(model_dir, &trained.report)?;
        Ok(trained)
    }
}

/// Rejects datasets that cannot be split with every class on both sides.
pub fn ensure_splittable(dataset: &TrainingDataset) -> Result<(), DataIntegrityError> {
    if dataset.is_empty() {
        return Err(DataIntegrityError::Empty);
    }
    let distribution = dataset.class_distribution();
    for disposition in Disposition::iter() {
        let count = distribution.get(disposition.as_str()).copied().unwrap_or(0);
        if count < MIN_ROWS_PER_CLASS {
            return Err(DataIntegrityError::TooFewSamples {
                disposition,
                count,
                required: MIN_ROWS_PER_CLASS,
            });
        }
    }
    Ok(())
}

pub fn write_diagnostics(dir: &Path, report: &TrainingReport) -> Result<(), TrainError> {
    let write = |file: &str, contents: String| {
        let path = dir.join(file);
        fs::write(&path, contents).map_err(|source| TrainError::Io { path, source })
    };
    write(
        FEATURE_IMPORTANCE_FILE,
        importances_to_csv(&report.feature_importances),
    )?;
    write(
        CONFUSION_MATRIX_FILE,
        report.confusion_matrix.to_csv(&report.class_labels),
    )?;
    write(TRAINING_REPORT_FILE, serde_json::to_string_pretty(report)?)?;
    info!("Wrote diagnostics to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ARTIFACT_FILES;
    use crate::classifiers::ForestParams;
    use crate::core::Verdict;
    use crate::core::features::FeatureVector;
    use crate::prediction::Predictor;
    use crate::testing::synthetic::{cluster_center_fields, synthetic_dataset};
    use tempfile::tempdir;

    fn quick_config() -> TrainingConfig {
        TrainingConfig {
            forest: ForestParams {
                n_trees: 20,
                ..ForestParams::default()
            },
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn separable_clusters_train_accurately() {
        let dataset = synthetic_dataset(40, 42);
        let trained = ModelTrainer::new(quick_config()).train(&dataset).unwrap();
        let report = &trained.report;

        assert_eq!(report.train_size + report.test_size, 120);
        assert_eq!(report.test_size, 24);
        assert!(report.test_accuracy >= 0.9, "accuracy {}", report.test_accuracy);
        assert!(report.cross_validation.mean >= 0.9);
        assert_eq!(report.cross_validation.fold_accuracies.len(), 5);
        assert_eq!(report.class_labels, vec!["CANDIDATE", "CONFIRMED", "FALSE POSITIVE"]);
        assert_eq!(report.confusion_matrix.total(), 24);

        let total: f64 = report.feature_importances.iter().map(|f| f.importance).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(
            report
                .feature_importances
                .windows(2)
                .all(|w| w[0].importance >= w[1].importance)
        );
    }

    #[test]
    fn saved_model_predicts_false_positive_cluster() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("models");
        let dataset = synthetic_dataset(40, 7);
        ModelTrainer::new(quick_config())
            .train_and_save(&dataset, None, &dir)
            .unwrap();

        for file in ARTIFACT_FILES
            .iter()
            .chain(&[FEATURE_IMPORTANCE_FILE, CONFUSION_MATRIX_FILE, TRAINING_REPORT_FILE])
        {
            assert!(dir.join(file).is_file(), "{file} missing");
        }
        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join(TRAINING_REPORT_FILE)).unwrap())
                .unwrap();
        assert!(report["trained_at"].is_string());
        assert!(report.get("preprocessing").is_none());
        let manifest = ArtifactBundle::read_manifest(&dir).unwrap();
        assert_eq!(report["run_id"], manifest.run_id.to_string());

        let predictor = Predictor::try_load(&dir).unwrap();
        let fp = FeatureVector::from_fields(cluster_center_fields(Disposition::FalsePositive))
            .unwrap();
        let result = predictor.predict(&fp).unwrap();
        assert_eq!(result.verdict, Verdict::FalsePositive);
        assert!(result.max_confidence > 0.5);

        let confirmed =
            FeatureVector::from_fields(cluster_center_fields(Disposition::Confirmed)).unwrap();
        let result = predictor.predict(&confirmed).unwrap();
        assert_eq!(result.verdict, Verdict::ConfirmedOrCandidate);
    }

    #[test]
    fn catalogue_csv_to_saved_model() {
        use crate::preprocessing::{DataPreprocessor, RawTable};
        use crate::testing::synthetic::synthetic_csv;

        let table = RawTable::parse(&synthetic_csv(30, 11), ',').unwrap();
        let preprocessed = DataPreprocessor::new().process(&table).unwrap();
        assert_eq!(preprocessed.summary.loaded, 93);
        assert_eq!(preprocessed.summary.after_disposition_filter, 90);
        assert!(!preprocessed.summary.imputations.is_empty());

        let tmp = tempdir().unwrap();
        let trained = ModelTrainer::new(quick_config())
            .train_and_save(
                &preprocessed.dataset,
                Some(preprocessed.summary.clone()),
                tmp.path(),
            )
            .unwrap();
        assert_eq!(trained.report.preprocessing, Some(preprocessed.summary));

        let csv = fs::read_to_string(tmp.path().join(FEATURE_IMPORTANCE_FILE)).unwrap();
        assert_eq!(csv.lines().next(), Some("feature,importance"));
        assert_eq!(csv.lines().count(), 13);
        let cm = fs::read_to_string(tmp.path().join(CONFUSION_MATRIX_FILE)).unwrap();
        assert_eq!(cm.lines().count(), 4);
    }

    #[test]
    fn rejects_datasets_missing_a_class() {
        let dataset = TrainingDataset::new(
            synthetic_dataset(5, 1)
                .records()
                .iter()
                .filter(|r| r.disposition != Disposition::Candidate)
                .cloned()
                .collect(),
        );
        let err = ModelTrainer::default().train(&dataset).unwrap_err();
        assert!(matches!(
            err,
            TrainError::Data(DataIntegrityError::TooFewSamples {
                disposition: Disposition::Candidate,
                count: 0,
                ..
            })
        ));

        let err = ModelTrainer::default()
            .train(&TrainingDataset::default())
            .unwrap_err();
        assert!(matches!(err, TrainError::Data(DataIntegrityError::Empty)));
    }
}
