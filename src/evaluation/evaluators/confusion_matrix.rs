use serde::Serialize;

use crate::classifiers::classifier::argmax;
use crate::evaluation::{Measurement, PerformanceEvaluator};

/// Counts of (true class, predicted class) pairs. Rows are true classes,
/// columns predicted classes, both indexed by class code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn new(num_classes: usize) -> Self {
        Self {
            counts: vec![vec![0; num_classes]; num_classes],
        }
    }

    pub fn from_predictions(num_classes: usize, truth: &[usize], predicted: &[usize]) -> Self {
        let mut cm = Self::new(num_classes);
        for (&t, &p) in truth.iter().zip(predicted) {
            cm.record(t, p);
        }
        cm
    }

    pub fn record(&mut self, true_class: usize, predicted_class: usize) {
        let k = self.num_classes();
        if true_class < k && predicted_class < k {
            self.counts[true_class][predicted_class] += 1;
        }
    }

    pub fn num_classes(&self) -> usize {
        self.counts.len()
    }

    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        (0..self.num_classes()).map(|c| self.counts[c][c]).sum()
    }

    /// Number of examples whose true class is `class`.
    pub fn support(&self, class: usize) -> usize {
        self.counts[class].iter().sum()
    }

    pub fn predicted(&self, class: usize) -> usize {
        self.counts.iter().map(|row| row[class]).sum()
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    /// Zero when the class was never predicted.
    pub fn precision(&self, class: usize) -> f64 {
        ratio(self.counts[class][class], self.predicted(class))
    }

    /// Zero when the class never occurs.
    pub fn recall(&self, class: usize) -> f64 {
        ratio(self.counts[class][class], self.support(class))
    }

    pub fn f1(&self, class: usize) -> f64 {
        harmonic(self.precision(class), self.recall(class))
    }

    /// Cohen's kappa. An empty matrix scores 0.0; a non-empty one whose
    /// chance agreement is total (a single class on both axes) is `NaN`.
    pub fn kappa(&self) -> f64 {
        let total = self.total() as f64;
        if total == 0.0 {
            return 0.0;
        }
        let p_o = self.accuracy();
        let p_e: f64 = (0..self.num_classes())
            .map(|c| (self.support(c) as f64 / total) * (self.predicted(c) as f64 / total))
            .sum();
        let denom = 1.0 - p_e;
        if denom.abs() > f64::EPSILON {
            (p_o - p_e) / denom
        } else {
            f64::NAN
        }
    }

    /// Comma-separated matrix with a header row of predicted labels and a
    /// leading column of true labels.
    pub fn to_csv(&self, labels: &[&str]) -> String {
        let mut out = String::from("true\\predicted");
        for label in labels {
            out.push(',');
            out.push_str(label);
        }
        out.push('\n');
        for (c, row) in self.counts.iter().enumerate() {
            out.push_str(labels.get(c).copied().unwrap_or(""));
            for n in row {
                out.push(',');
                out.push_str(&n.to_string());
            }
            out.push('\n');
        }
        out
    }
}

impl PerformanceEvaluator for ConfusionMatrix {
    fn reset(&mut self) {
        *self = Self::new(self.num_classes());
    }

    fn add_result(&mut self, true_class: usize, class_votes: &[f64]) {
        if let Some(predicted) = argmax(class_votes) {
            self.record(true_class, predicted);
        }
    }

    fn performance(&self) -> Vec<Measurement> {
        let k = self.num_classes();
        let macro_avg = |f: &dyn Fn(usize) -> f64| {
            if k == 0 {
                f64::NAN
            } else {
                (0..k).map(f).sum::<f64>() / k as f64
            }
        };
        vec![
            Measurement::new("accuracy", self.accuracy()),
            Measurement::new("kappa", self.kappa()),
            Measurement::new("precision", macro_avg(&|c| self.precision(c))),
            Measurement::new("recall", macro_avg(&|c| self.recall(c))),
            Measurement::new("f1", macro_avg(&|c| self.f1(c))),
        ]
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn harmonic(p: f64, r: f64) -> f64 {
    let s = p + r;
    if s > f64::EPSILON { 2.0 * p * r / s } else { 0.0 }
}
