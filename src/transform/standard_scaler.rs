use crate::core::features::{FEATURE_COUNT, FeatureRow};
use crate::utils::math::mean_std;
use serde::{Deserialize, Serialize};

/// Per-feature standardization: `(x - mean) / scale`.
///
/// Parameters are fixed by [`StandardScaler::fit`]; transforming borrows the
/// scaler immutably, so applying it to test or inference data can never
/// refit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    /// Fits mean and population standard deviation per feature.
    ///
    /// A feature with zero variance gets scale 1.0 so it passes through
    /// centered but unscaled.
    pub fn fit(rows: &[FeatureRow]) -> Self {
        let mut mean = [0.0; FEATURE_COUNT];
        let mut scale = [1.0; FEATURE_COUNT];
        let mut column = Vec::with_capacity(rows.len());
        for j in 0..FEATURE_COUNT {
            column.clear();
            column.extend(rows.iter().map(|r| r[j]));
            let (m, s) = mean_std(&column);
            mean[j] = m;
            scale[j] = if s > 0.0 && s.is_finite() { s } else { 1.0 };
        }
        Self { mean, scale }
    }

    pub fn transform(&self, row: &FeatureRow) -> FeatureRow {
        let mut out = [0.0; FEATURE_COUNT];
        for (j, x) in out.iter_mut().enumerate() {
            *x = (row[j] - self.mean[j]) / self.scale[j];
        }
        out
    }

    pub fn transform_all(&self, rows: &[FeatureRow]) -> Vec<FeatureRow> {
        rows.iter().map(|r| self.transform(r)).collect()
    }

    pub fn mean(&self) -> &[f64; FEATURE_COUNT] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64; FEATURE_COUNT] {
        &self.scale
    }

    /// Whether every parameter is a usable finite number.
    pub fn is_valid(&self) -> bool {
        self.mean.iter().all(|m| m.is_finite())
            && self.scale.iter().all(|s| s.is_finite() && *s > 0.0)
    }
}
