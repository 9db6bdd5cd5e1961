use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifiers::classifier::Classifier;
use crate::classifiers::random_forest::decision_tree::DecisionTree;
use crate::classifiers::random_forest::params::ForestParams;

#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    #[error("cannot fit a forest on zero samples")]
    Empty,
    #[error("{rows} feature rows but {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },
    #[error("label {label} is out of range for {n_classes} classes")]
    LabelOutOfRange { label: usize, n_classes: usize },
    #[error("invalid forest parameters: {0}")]
    InvalidParams(String),
}

/// Bagged ensemble of CART trees; votes are the mean of the trees' leaf
/// class fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    n_classes: usize,
    n_features: usize,
    trees: Vec<DecisionTree>,
    feature_importances: Vec<f64>,
}

impl RandomForest {
    pub fn fit<R: AsRef<[f64]>>(
        rows: &[R],
        labels: &[usize],
        n_classes: usize,
        params: &ForestParams,
    ) -> Result<Self, FitError> {
        if rows.is_empty() {
            return Err(FitError::Empty);
        }
        if rows.len() != labels.len() {
            return Err(FitError::LengthMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        if let Some(&label) = labels.iter().find(|&&l| l >= n_classes) {
            return Err(FitError::LabelOutOfRange { label, n_classes });
        }
        if params.n_trees == 0 {
            return Err(FitError::InvalidParams("n_trees must be at least 1".into()));
        }
        if params.max_depth == Some(0) {
            return Err(FitError::InvalidParams("max_depth must be at least 1".into()));
        }

        let n = rows.len();
        let mut master = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);
        for _ in 0..params.n_trees {
            let mut rng = StdRng::seed_from_u64(master.random::<u64>());
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
            trees.push(DecisionTree::fit(
                rows, labels, n_classes, bootstrap, params, &mut rng,
            ));
        }
        log::debug!(
            "fitted {} trees on {} samples (mean {:.1} nodes)",
            trees.len(),
            n,
            trees.iter().map(|t| t.node_count()).sum::<usize>() as f64 / trees.len() as f64
        );

        let n_features = rows[0].as_ref().len();
        Ok(Self::from_trees(params.clone(), n_classes, n_features, trees))
    }

    /// Assembles a forest from already-built trees.
    pub fn from_trees(
        params: ForestParams,
        n_classes: usize,
        n_features: usize,
        trees: Vec<DecisionTree>,
    ) -> Self {
        let feature_importances = aggregate_importances(&trees, n_features);
        Self {
            params,
            n_classes,
            n_features,
            trees,
            feature_importances,
        }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    pub fn predict_proba(&self, instance: &[f64]) -> Vec<f64> {
        self.get_votes_for_instance(instance)
    }

    /// Mean decrease in impurity per feature, summing to 1 unless no tree
    /// ever split.
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".into());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            if tree.number_of_classes() != self.n_classes
                || tree.number_of_features() != self.n_features
            {
                return Err(format!("tree {i} does not match the forest shape"));
            }
            tree.validate().map_err(|e| format!("tree {i}: {e}"))?;
        }
        if self.feature_importances.len() != self.n_features {
            return Err("importance vector does not match the feature count".into());
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn get_votes_for_instance(&self, instance: &[f64]) -> Vec<f64> {
        let mut votes = vec![0.0; self.n_classes];
        if self.trees.is_empty() {
            return votes;
        }
        for tree in &self.trees {
            for (acc, v) in votes.iter_mut().zip(tree.get_votes_for_instance(instance)) {
                *acc += v;
            }
        }
        let n = self.trees.len() as f64;
        for v in votes.iter_mut() {
            *v /= n;
        }
        votes
    }

    fn number_of_classes(&self) -> usize {
        self.n_classes
    }

    fn number_of_features(&self) -> usize {
        self.n_features
    }
}

fn aggregate_importances(trees: &[DecisionTree], n_features: usize) -> Vec<f64> {
    let mut sum = vec![0.0; n_features];
    let mut contributing = 0usize;
    for tree in trees.iter().filter(|t| t.node_count() > 1) {
        contributing += 1;
        for (acc, v) in sum.iter_mut().zip(tree.feature_importances()) {
            *acc += v;
        }
    }
    if contributing == 0 {
        return sum;
    }
    let total: f64 = sum.iter().sum();
    if total > 0.0 {
        for v in sum.iter_mut() {
            *v /= total;
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> (Vec<[f64; 3]>, Vec<usize>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..30 {
            let jitter = (i % 5) as f64 * 0.1;
            rows.push([jitter, 5.0 + jitter, 1.0]);
            labels.push(0);
            rows.push([10.0 + jitter, 5.0 - jitter, 1.0]);
            labels.push(1);
            rows.push([20.0 + jitter, 5.0, 1.0]);
            labels.push(2);
        }
        (rows, labels)
    }

    fn small_params() -> ForestParams {
        ForestParams {
            n_trees: 15,
            ..ForestParams::default()
        }
    }

    #[test]
    fn fits_separable_classes() {
        let (rows, labels) = blobs();
        let forest = RandomForest::fit(&rows, &labels, 3, &small_params()).unwrap();

        assert_eq!(forest.trees().len(), 15);
        assert!(forest.validate().is_ok());
        assert_eq!(forest.predict(&[0.2, 5.0, 1.0]), 0);
        assert_eq!(forest.predict(&[10.2, 5.0, 1.0]), 1);
        assert_eq!(forest.predict(&[20.2, 5.0, 1.0]), 2);

        let proba = forest.predict_proba(&[20.2, 5.0, 1.0]);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);

        let imp = forest.feature_importances();
        assert!((imp.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert_eq!(imp[2], 0.0);
    }

    #[test]
    fn same_seed_same_forest() {
        let (rows, labels) = blobs();
        let a = RandomForest::fit(&rows, &labels, 3, &small_params()).unwrap();
        let b = RandomForest::fit(&rows, &labels, 3, &small_params()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_bad_inputs() {
        let rows = vec![[0.0], [1.0]];
        assert_eq!(
            RandomForest::fit(&rows, &[0], 2, &small_params()).unwrap_err(),
            FitError::LengthMismatch { rows: 2, labels: 1 }
        );
        assert_eq!(
            RandomForest::fit(&rows, &[0, 3], 2, &small_params()).unwrap_err(),
            FitError::LabelOutOfRange {
                label: 3,
                n_classes: 2
            }
        );
        let empty: Vec<[f64; 1]> = Vec::new();
        assert_eq!(
            RandomForest::fit(&empty, &[], 2, &small_params()).unwrap_err(),
            FitError::Empty
        );
        let mut p = small_params();
        p.n_trees = 0;
        assert!(matches!(
            RandomForest::fit(&rows, &[0, 1], 2, &p),
            Err(FitError::InvalidParams(_))
        ));
    }

    #[test]
    fn votes_average_over_trees() {
        let forest = RandomForest::from_trees(
            ForestParams::default(),
            2,
            1,
            vec![
                DecisionTree::leaf(vec![1.0, 0.0], 1),
                DecisionTree::leaf(vec![0.0, 1.0], 1),
            ],
        );
        assert_eq!(forest.get_votes_for_instance(&[0.0]), vec![0.5, 0.5]);
        assert_eq!(forest.feature_importances(), &[0.0]);
    }
}
