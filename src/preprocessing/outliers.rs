use crate::core::LabeledRecord;
use crate::core::features::FeatureId;
use crate::utils::math::quantile_sorted;
use serde::Serialize;
use strum::IntoEnumIterator;

/// Tukey fence multiplier applied to the interquartile range.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Fence computed for one feature during outlier removal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierFence {
    pub feature: FeatureId,
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
    pub removed: usize,
}

impl OutlierFence {
    fn for_values(feature: FeatureId, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        Self {
            feature,
            q1,
            q3,
            lower: q1 - IQR_MULTIPLIER * iqr,
            upper: q3 + IQR_MULTIPLIER * iqr,
            removed: 0,
        }
    }

    #[inline]
    pub fn admits(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Applies the IQR rule to each feature in schema order.
///
/// Filtering narrows sequentially: the fence for a feature is computed on
/// the rows that survived every earlier feature's fence.
pub fn remove_outliers(mut records: Vec<LabeledRecord>) -> (Vec<LabeledRecord>, Vec<OutlierFence>) {
    let mut fences = Vec::new();
    for id in FeatureId::iter() {
        if records.is_empty() {
            break;
        }
        let values: Vec<f64> = records.iter().map(|r| r.features.get(id)).collect();
        let mut fence = OutlierFence::for_values(id, &values);

        let before = records.len();
        records.retain(|r| fence.admits(r.features.get(id)));
        fence.removed = before - records.len();

        log::debug!(
            "{}: kept [{:.4}, {:.4}], removed {}",
            id.column(),
            fence.lower,
            fence.upper,
            fence.removed
        );
        fences.push(fence);
    }
    (records, fences)
}
