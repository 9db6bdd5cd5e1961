use crate::evaluation::Measurement;
use std::collections::HashMap;

/// Accumulates predictions against ground truth and summarizes them as
/// [`Measurement`]s.
pub trait PerformanceEvaluator {
    /// Clears accumulated results; the class count is kept.
    fn reset(&mut self);

    /// Feeds one example's true class code and its class votes (one score
    /// per class). Unusable votes are skipped.
    fn add_result(&mut self, true_class: usize, class_votes: &[f64]);

    /// Returns a snapshot of current metrics.
    fn performance(&self) -> Vec<Measurement>;
}

pub trait PerformanceEvaluatorExt {
    /// Returns (name, Some(value)|None) for each requested metric, preserving order.
    fn metrics<'a, I>(&self, names: I) -> Vec<(String, Option<f64>)>
    where
        I: IntoIterator<Item = &'a str>;

    fn metric(&self, name: &str) -> Option<f64> {
        self.metrics([name]).into_iter().next().and_then(|(_, v)| v)
    }
}

impl<T: PerformanceEvaluator + ?Sized> PerformanceEvaluatorExt for T {
    fn metrics<'a, I>(&self, names: I) -> Vec<(String, Option<f64>)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ms = self.performance();
        let map: HashMap<_, _> = ms.into_iter().map(|m| (m.name, m.value)).collect();
        names
            .into_iter()
            .map(|n| (n.to_string(), map.get(n).copied()))
            .collect()
    }
}
