use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::classifiers::{Classifier, FitError, ForestParams, RandomForest};
use crate::evaluation::{Estimator, MomentsEstimator};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossValidationScores {
    pub fold_accuracies: Vec<f64>,
    pub mean: f64,
    /// Population standard deviation of the fold accuracies.
    pub std_dev: f64,
}

impl CrossValidationScores {
    pub fn from_folds(fold_accuracies: Vec<f64>) -> Self {
        let mut moments = MomentsEstimator::default();
        for &a in &fold_accuracies {
            moments.add(a);
        }
        Self {
            mean: moments.estimation(),
            std_dev: moments.std_dev(),
            fold_accuracies,
        }
    }

    /// `mean ± 2·std` as printed in training summaries.
    pub fn summary(&self) -> String {
        format!("{:.4} (+/- {:.4})", self.mean, 2.0 * self.std_dev)
    }
}

/// Assigns each sample a fold so that every class is spread round-robin
/// across the folds after a seeded shuffle.
pub fn stratified_folds(labels: &[usize], n_classes: usize, k: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut fold_of = vec![0; labels.len()];
    let mut next = 0usize;
    for class in 0..n_classes {
        let mut members: Vec<usize> = (0..labels.len()).filter(|&i| labels[i] == class).collect();
        members.shuffle(&mut rng);
        for i in members {
            fold_of[i] = next % k;
            next += 1;
        }
    }
    fold_of
}

/// Stratified k-fold accuracy of a forest fitted with `params` on all but
/// one fold and scored on the held-out fold. `fold_seed` drives the fold
/// assignment only.
pub fn cross_validate<R: AsRef<[f64]>>(
    rows: &[R],
    labels: &[usize],
    n_classes: usize,
    k: usize,
    params: &ForestParams,
    fold_seed: u64,
) -> Result<CrossValidationScores, FitError> {
    if k < 2 {
        return Err(FitError::InvalidParams("cross-validation needs at least 2 folds".into()));
    }
    if rows.len() < k {
        return Err(FitError::InvalidParams(format!(
            "{} samples cannot fill {k} folds",
            rows.len()
        )));
    }

    let fold_of = stratified_folds(labels, n_classes, k, fold_seed);
    let mut accuracies = Vec::with_capacity(k);
    for fold in 0..k {
        let (mut train_rows, mut train_labels) = (Vec::new(), Vec::new());
        let mut held_out = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            if fold_of[i] == fold {
                held_out.push(i);
            } else {
                train_rows.push(row.as_ref());
                train_labels.push(labels[i]);
            }
        }

        let forest = RandomForest::fit(&train_rows, &train_labels, n_classes, params)?;
        let correct = held_out
            .iter()
            .filter(|&&i| forest.predict(rows[i].as_ref()) == labels[i])
            .count();
        let accuracy = correct as f64 / held_out.len() as f64;
        log::debug!("fold {}/{k}: accuracy {accuracy:.4}", fold + 1);
        accuracies.push(accuracy);
    }
    Ok(CrossValidationScores::from_folds(accuracies))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_are_stratified_and_balanced() {
        let labels: Vec<usize> = (0..30).map(|i| i % 3).collect();
        let folds = stratified_folds(&labels, 3, 5, 42);
        for fold in 0..5 {
            for class in 0..3 {
                let n = (0..30).filter(|&i| folds[i] == fold && labels[i] == class).count();
                assert_eq!(n, 2);
            }
        }
    }

    #[test]
    fn summary_reports_two_standard_deviations() {
        let scores = CrossValidationScores::from_folds(vec![0.5, 1.0]);
        assert_eq!(scores.mean, 0.75);
        assert_eq!(scores.std_dev, 0.25);
        assert_eq!(scores.summary(), "0.7500 (+/- 0.5000)");
    }

    #[test]
    fn separable_data_scores_high() {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            let j = (i % 4) as f64 * 0.1;
            rows.push([j, 1.0]);
            labels.push(0);
            rows.push([5.0 + j, 1.0]);
            labels.push(1);
        }
        let params = ForestParams {
            n_trees: 5,
            ..ForestParams::default()
        };
        let scores = cross_validate(&rows, &labels, 2, 5, &params, 42).unwrap();
        assert_eq!(scores.fold_accuracies.len(), 5);
        assert!(scores.mean > 0.9);
    }

    #[test]
    fn rejects_too_few_samples() {
        let rows = vec![[0.0], [1.0]];
        assert!(cross_validate(&rows, &[0, 1], 2, 5, &ForestParams::default(), 42).is_err());
    }
}
