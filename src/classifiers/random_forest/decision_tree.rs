use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::classifiers::classifier::Classifier;
use crate::classifiers::random_forest::node::Node;
use crate::classifiers::random_forest::params::ForestParams;
use crate::classifiers::split_criteria::{GiniSplitCriterion, SplitCriterion};

/// Splits whose impurity decrease does not exceed this are not taken.
const MIN_SPLIT_MERIT: f64 = 1e-12;

/// CART tree grown on a bootstrap sample, stored as a node arena rooted at
/// index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    n_classes: usize,
    n_features: usize,
    nodes: Vec<Node>,
    feature_importances: Vec<f64>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    merit: f64,
}

struct TreeBuilder<'a, R: AsRef<[f64]>> {
    rows: &'a [R],
    labels: &'a [usize],
    n_classes: usize,
    n_features: usize,
    max_features: usize,
    params: &'a ForestParams,
    criterion: GiniSplitCriterion,
    rng: &'a mut StdRng,
    nodes: Vec<Node>,
    importances: Vec<f64>,
}

impl DecisionTree {
    /// Grows a tree over `sample`, a list of row indices that may repeat.
    pub fn fit<R: AsRef<[f64]>>(
        rows: &[R],
        labels: &[usize],
        n_classes: usize,
        sample: Vec<usize>,
        params: &ForestParams,
        rng: &mut StdRng,
    ) -> Self {
        let n_features = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut builder = TreeBuilder {
            rows,
            labels,
            n_classes,
            n_features,
            max_features: params.max_features.resolve(n_features),
            params,
            criterion: GiniSplitCriterion::new(),
            rng,
            nodes: Vec::new(),
            importances: vec![0.0; n_features],
        };
        builder.grow(sample, 0);

        let TreeBuilder {
            nodes, importances, ..
        } = builder;
        Self {
            n_classes,
            n_features,
            nodes,
            feature_importances: normalized(importances),
        }
    }

    /// Single-leaf tree that votes `distribution` for every instance.
    pub fn leaf(distribution: Vec<f64>, n_features: usize) -> Self {
        Self {
            n_classes: distribution.len(),
            n_features,
            nodes: vec![Node::Leaf {
                observed_class_distribution: distribution,
            }],
            feature_importances: vec![0.0; n_features],
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }

    /// Impurity-decrease importances, normalized to sum to 1 (all zero for a
    /// tree that never split).
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// Structural checks for a tree read back from storage. Children must
    /// point forward in the arena so traversal always terminates.
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        if self.feature_importances.len() != self.n_features {
            return Err(format!(
                "tree has {} importances for {} features",
                self.feature_importances.len(),
                self.n_features
            ));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= self.n_features {
                        return Err(format!("node {idx} splits on unknown feature {feature}"));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {idx} has a non-finite threshold"));
                    }
                    for child in [left, right] {
                        if *child <= idx || *child >= self.nodes.len() {
                            return Err(format!("node {idx} has invalid child {child}"));
                        }
                    }
                }
                Node::Leaf {
                    observed_class_distribution,
                } => {
                    if observed_class_distribution.len() != self.n_classes {
                        return Err(format!(
                            "leaf {idx} has {} classes, expected {}",
                            observed_class_distribution.len(),
                            self.n_classes
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_for(&self, instance: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf {
                    observed_class_distribution,
                } => return observed_class_distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = instance.get(*feature).copied().unwrap_or(f64::NAN);
                    idx = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

impl Classifier for DecisionTree {
    fn get_votes_for_instance(&self, instance: &[f64]) -> Vec<f64> {
        self.leaf_for(instance).to_vec()
    }

    fn number_of_classes(&self) -> usize {
        self.n_classes
    }

    fn number_of_features(&self) -> usize {
        self.n_features
    }
}

impl<R: AsRef<[f64]>> TreeBuilder<'_, R> {
    fn value(&self, row: usize, feature: usize) -> f64 {
        self.rows[row].as_ref()[feature]
    }

    fn class_counts(&self, sample: &[usize]) -> Vec<f64> {
        let mut counts = vec![0.0; self.n_classes];
        for &i in sample {
            counts[self.labels[i]] += 1.0;
        }
        counts
    }

    fn grow(&mut self, sample: Vec<usize>, depth: usize) -> usize {
        let counts = self.class_counts(&sample);
        let idx = self.nodes.len();
        self.nodes.push(Node::leaf_from_counts(&counts));

        let pure = counts.iter().filter(|&&c| c > 0.0).count() <= 1;
        let depth_reached = self.params.max_depth.is_some_and(|d| depth >= d);
        if pure || depth_reached || sample.len() < self.params.min_samples_split {
            return idx;
        }

        let Some(best) = self.best_split(&sample, &counts) else {
            return idx;
        };

        self.importances[best.feature] += sample.len() as f64 * best.merit;
        let (left_sample, right_sample): (Vec<usize>, Vec<usize>) = sample
            .into_iter()
            .partition(|&i| self.value(i, best.feature) <= best.threshold);

        let left = self.grow(left_sample, depth + 1);
        let right = self.grow(right_sample, depth + 1);
        self.nodes[idx] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        idx
    }

    fn best_split(&mut self, sample: &[usize], counts: &[f64]) -> Option<SplitCandidate> {
        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(&mut *self.rng);

        let min_leaf = self.params.min_samples_leaf.max(1);
        let n = sample.len();
        let mut best: Option<SplitCandidate> = None;
        let mut sorted = sample.to_vec();

        // Keep drawing past `max_features` until some usable split turns up.
        for (visited, feature) in features.into_iter().enumerate() {
            if visited >= self.max_features && best.as_ref().is_some_and(|b| b.merit > MIN_SPLIT_MERIT)
            {
                break;
            }
            sorted.sort_by(|&a, &b| self.value(a, feature).total_cmp(&self.value(b, feature)));

            let mut left = vec![0.0; self.n_classes];
            let mut right = counts.to_vec();
            for pos in 0..n - 1 {
                let label = self.labels[sorted[pos]];
                left[label] += 1.0;
                right[label] -= 1.0;

                let lower = self.value(sorted[pos], feature);
                let upper = self.value(sorted[pos + 1], feature);
                if lower >= upper {
                    continue;
                }
                let n_left = pos + 1;
                if n_left < min_leaf || n - n_left < min_leaf {
                    continue;
                }

                let merit = self
                    .criterion
                    .get_merit_of_split(counts, &[left.as_slice(), right.as_slice()]);
                if best.as_ref().is_none_or(|b| merit > b.merit) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: midpoint(lower, upper),
                        merit,
                    });
                }
            }
        }

        best.filter(|b| b.merit > MIN_SPLIT_MERIT)
    }
}

/// Threshold between two adjacent distinct values; falls back to `lower`
/// when the midpoint rounds up to `upper`.
fn midpoint(lower: f64, upper: f64) -> f64 {
    let mid = lower + (upper - lower) / 2.0;
    if mid >= upper || !mid.is_finite() { lower } else { mid }
}

fn normalized(mut values: Vec<f64>) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        for v in values.iter_mut() {
            *v /= total;
        }
    }
    values
}
