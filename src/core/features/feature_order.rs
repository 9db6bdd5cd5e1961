use crate::core::features::{FEATURE_COUNT, FeatureId};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use strum::IntoEnumIterator;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeatureOrderError {
    #[error("unknown feature name \"{0}\"")]
    UnknownFeature(String),

    #[error("feature \"{0}\" listed more than once")]
    Duplicate(FeatureId),

    #[error("expected 12 feature names, found {0}")]
    WrongLength(usize),
}

/// Order in which features are presented to the scaler and the classifier.
///
/// Always a permutation of the twelve-feature schema. Persisted as one
/// catalogue column name per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureOrder {
    ids: Vec<FeatureId>,
}

impl FeatureOrder {
    pub fn new(ids: Vec<FeatureId>) -> Result<Self, FeatureOrderError> {
        if ids.len() != FEATURE_COUNT {
            return Err(FeatureOrderError::WrongLength(ids.len()));
        }
        let mut seen = HashSet::new();
        for id in &ids {
            if !seen.insert(*id) {
                return Err(FeatureOrderError::Duplicate(*id));
            }
        }
        Ok(Self { ids })
    }

    /// Schema order, used for every training run.
    pub fn canonical() -> Self {
        Self {
            ids: FeatureId::iter().collect(),
        }
    }

    /// Parses the newline-delimited form, ignoring blank lines.
    pub fn parse(text: &str) -> Result<Self, FeatureOrderError> {
        let ids = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                FeatureId::from_column(line)
                    .ok_or_else(|| FeatureOrderError::UnknownFeature(line.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(ids)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for id in &self.ids {
            out.push_str(id.column());
            out.push('\n');
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = FeatureId> + '_ {
        self.ids.iter().copied()
    }

    pub fn columns(&self) -> Vec<String> {
        self.ids.iter().map(|id| id.column().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Display for FeatureOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.columns().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_round_trips_through_text() {
        let order = FeatureOrder::canonical();
        let text = order.to_text();
        assert!(text.starts_with("koi_period\nkoi_duration\n"));
        assert!(text.ends_with("koi_slogg\n"));
        assert_eq!(FeatureOrder::parse(&text).unwrap(), order);
    }

    #[test]
    fn parse_rejects_drift() {
        let text = FeatureOrder::canonical().to_text();

        let renamed = text.replace("koi_prad", "koi_radius");
        assert_eq!(
            FeatureOrder::parse(&renamed).unwrap_err(),
            FeatureOrderError::UnknownFeature("koi_radius".into())
        );

        let truncated: String = text.lines().take(11).map(|l| format!("{l}\n")).collect();
        assert_eq!(
            FeatureOrder::parse(&truncated).unwrap_err(),
            FeatureOrderError::WrongLength(11)
        );

        let duplicated = text.replace("koi_slogg", "koi_period");
        assert_eq!(
            FeatureOrder::parse(&duplicated).unwrap_err(),
            FeatureOrderError::Duplicate(FeatureId::OrbitalPeriod)
        );
    }
}
