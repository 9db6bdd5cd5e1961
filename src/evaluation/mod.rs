mod classification_report;
mod cross_validation;
mod estimators;
mod evaluators;
mod feature_importance;
mod measurement;

pub use classification_report::{AveragedScores, ClassScores, ClassificationReport};
pub use cross_validation::{CrossValidationScores, cross_validate, stratified_folds};
pub use estimators::{Estimator, MomentsEstimator};
pub use evaluators::{ConfusionMatrix, PerformanceEvaluator, PerformanceEvaluatorExt};
pub use feature_importance::{RankedFeature, importances_to_csv, rank_features};
pub use measurement::Measurement;
