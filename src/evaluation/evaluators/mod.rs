mod confusion_matrix;
mod performance_evaluator;

pub use confusion_matrix::ConfusionMatrix;
pub use performance_evaluator::{PerformanceEvaluator, PerformanceEvaluatorExt};
