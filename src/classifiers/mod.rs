pub mod classifier;
pub mod random_forest;
pub mod split_criteria;

pub use classifier::Classifier;
pub use random_forest::{DecisionTree, FitError, ForestParams, MaxFeatures, RandomForest};
