use crate::classifiers::split_criteria::SplitCriterion;

#[derive(Debug, Default, Clone, Copy)]
pub struct GiniSplitCriterion {}

impl GiniSplitCriterion {
    pub fn new() -> Self {
        Self {}
    }

    pub fn compute_gini(&self, distribution: &[f64], distribution_sum_of_weights: f64) -> f64 {
        if distribution_sum_of_weights <= 0.0 {
            return 0.0;
        }
        let mut gini = 1.0;
        for i in distribution {
            let rel_freq = i / distribution_sum_of_weights;
            gini -= rel_freq.powi(2);
        }
        gini
    }
}

impl SplitCriterion for GiniSplitCriterion {
    fn get_merit_of_split(&self, pre_split_distribution: &[f64], post_split_dists: &[&[f64]]) -> f64 {
        let total: f64 = pre_split_distribution.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        let mut weighted_children = 0.0;
        for dist in post_split_dists {
            let w: f64 = dist.iter().sum();
            weighted_children += (w / total) * self.compute_gini(dist, w);
        }
        self.compute_gini(pre_split_distribution, total) - weighted_children
    }
}
