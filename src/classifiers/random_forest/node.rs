use serde::{Deserialize, Serialize};

/// Arena slot of a fitted decision tree. Children are referenced by index
/// into the owning tree's node vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class fractions of the training samples that reached this leaf.
        observed_class_distribution: Vec<f64>,
    },
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn leaf_from_counts(counts: &[f64]) -> Self {
        let total: f64 = counts.iter().sum();
        let observed_class_distribution = if total > 0.0 {
            counts.iter().map(|c| c / total).collect()
        } else {
            vec![1.0 / counts.len().max(1) as f64; counts.len()]
        };
        Node::Leaf {
            observed_class_distribution,
        }
    }
}
