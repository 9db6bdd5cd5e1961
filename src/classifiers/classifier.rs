/// A fitted model producing class votes for a feature instance.
pub trait Classifier {
    /// Class-probability votes, one entry per class code, summing to 1.
    fn get_votes_for_instance(&self, instance: &[f64]) -> Vec<f64>;

    fn number_of_classes(&self) -> usize;

    fn number_of_features(&self) -> usize;

    /// Class code with the highest vote; the lowest code wins ties.
    fn predict(&self, instance: &[f64]) -> usize {
        argmax(&self.get_votes_for_instance(instance)).unwrap_or(0)
    }
}

#[inline]
pub fn argmax(v: &[f64]) -> Option<usize> {
    let mut best = None;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &x) in v.iter().enumerate() {
        if !x.is_finite() {
            continue;
        }
        if best.is_none() || x > best_value {
            best = Some(i);
            best_value = x;
        }
    }
    best
}
