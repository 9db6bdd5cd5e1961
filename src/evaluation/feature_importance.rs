use serde::Serialize;

use crate::core::features::{FeatureId, FeatureOrder};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFeature {
    pub feature: FeatureId,
    pub column: &'static str,
    pub importance: f64,
}

/// Pairs importances with the features they were computed for and sorts
/// them descending; equal scores keep feature order.
pub fn rank_features(order: &FeatureOrder, importances: &[f64]) -> Vec<RankedFeature> {
    let mut ranked: Vec<RankedFeature> = order
        .iter()
        .zip(importances)
        .map(|(feature, &importance)| RankedFeature {
            feature,
            column: feature.column(),
            importance,
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
}

pub fn importances_to_csv(ranked: &[RankedFeature]) -> String {
    let mut out = String::from("feature,importance\n");
    for r in ranked {
        out.push_str(&format!("{},{}\n", r.column, r.importance));
    }
    out
}
