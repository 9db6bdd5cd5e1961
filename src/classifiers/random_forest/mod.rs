mod decision_tree;
mod node;
mod params;
#[allow(clippy::module_inception)]
mod random_forest;

pub use decision_tree::DecisionTree;
pub use node::Node;
pub use params::{ForestParams, MaxFeatures};
pub use random_forest::{FitError, RandomForest};
