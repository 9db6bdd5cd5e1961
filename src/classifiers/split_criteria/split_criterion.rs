/// Scores a candidate partition of a node's class distribution.
pub trait SplitCriterion {
    /// Impurity decrease obtained by splitting `pre_split_distribution` into
    /// `post_split_dists`. Larger is better.
    fn get_merit_of_split(&self, pre_split_distribution: &[f64], post_split_dists: &[&[f64]])
    -> f64;
}
