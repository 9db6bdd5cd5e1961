use serde::Serialize;

use crate::core::{Disposition, Verdict};

/// Probabilities of the two merged outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceScores {
    #[serde(rename = "CONFIRMED/CANDIDATE")]
    pub confirmed_or_candidate: f64,
    #[serde(rename = "FALSE POSITIVE")]
    pub false_positive: f64,
}

impl ConfidenceScores {
    /// Sums the per-class probabilities into the two merged outcomes.
    /// `classes[i]` names the class of `probabilities[i]`.
    pub fn merge(classes: &[Disposition], probabilities: &[f64]) -> Self {
        let mut scores = Self {
            confirmed_or_candidate: 0.0,
            false_positive: 0.0,
        };
        for (class, &p) in classes.iter().zip(probabilities) {
            if class.is_confirmed_or_candidate() {
                scores.confirmed_or_candidate += p;
            } else {
                scores.false_positive += p;
            }
        }
        scores
    }

    /// Positive only on a strict majority; a tie is a false positive.
    pub fn verdict(&self) -> Verdict {
        if self.confirmed_or_candidate > self.false_positive {
            Verdict::ConfirmedOrCandidate
        } else {
            Verdict::FalsePositive
        }
    }

    pub fn winning_score(&self) -> f64 {
        match self.verdict() {
            Verdict::ConfirmedOrCandidate => self.confirmed_or_candidate,
            Verdict::FalsePositive => self.false_positive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub verdict: Verdict,
    pub confidence_scores: ConfidenceScores,
    pub max_confidence: f64,
    pub features_used: Vec<String>,
}

impl PredictionResult {
    pub fn from_scores(confidence_scores: ConfidenceScores, features_used: Vec<String>) -> Self {
        Self {
            verdict: confidence_scores.verdict(),
            max_confidence: confidence_scores.winning_score(),
            confidence_scores,
            features_used,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassProbability {
    pub class: Disposition,
    pub probability: f64,
}

/// Unmerged distribution over the persisted classes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawPrediction {
    pub label: Disposition,
    pub probabilities: Vec<ClassProbability>,
}
