use crate::core::features::{FEATURE_COUNT, FeatureId, FeatureVector};
use crate::core::{Disposition, LabeledRecord};
use crate::preprocessing::DataIntegrityError;
use crate::utils::math::median;

/// A labeled row whose features may still be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialRecord {
    pub values: [Option<f64>; FEATURE_COUNT],
    pub disposition: Disposition,
}

/// Median substituted for one optional feature.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Imputation {
    pub feature: FeatureId,
    pub median: f64,
    pub filled: usize,
}

/// Tokens read as a missing cell, besides the empty string.
const MISSING_TOKENS: [&str; 5] = ["nan", "na", "n/a", "null", "none"];

pub fn is_missing_token(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || MISSING_TOKENS.iter().any(|t| cell.eq_ignore_ascii_case(t))
}

/// Drops rows missing any required feature.
pub fn drop_incomplete_required(records: Vec<PartialRecord>) -> Vec<PartialRecord> {
    records
        .into_iter()
        .filter(|r| FeatureId::required().all(|id| r.values[id.index()].is_some()))
        .collect()
}

/// Fills optional features with their column median.
///
/// Medians are taken over `records` as given, so callers drop incomplete
/// required rows first.
pub fn impute_optional_with_median(
    mut records: Vec<PartialRecord>,
) -> Result<(Vec<LabeledRecord>, Vec<Imputation>), DataIntegrityError> {
    let mut imputations = Vec::new();

    for id in FeatureId::optional() {
        let observed: Vec<f64> = records.iter().filter_map(|r| r.values[id.index()]).collect();
        let filled = records.len() - observed.len();
        if filled == 0 {
            continue;
        }
        if observed.is_empty() {
            return Err(DataIntegrityError::NoObservedValues(id));
        }
        let m = median(&observed);
        for r in records.iter_mut().filter(|r| r.values[id.index()].is_none()) {
            r.values[id.index()] = Some(m);
        }
        imputations.push(Imputation {
            feature: id,
            median: m,
            filled,
        });
    }

    let complete = records
        .into_iter()
        .map(|r| {
            let mut values = [0.0; FEATURE_COUNT];
            for (dst, src) in values.iter_mut().zip(r.values) {
                *dst = src.unwrap_or(f64::NAN);
            }
            LabeledRecord::new(FeatureVector::from_values(values), r.disposition)
        })
        .collect();

    Ok((complete, imputations))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(values: [Option<f64>; FEATURE_COUNT]) -> PartialRecord {
        PartialRecord {
            values,
            disposition: Disposition::Candidate,
        }
    }

    fn full(v: f64) -> [Option<f64>; FEATURE_COUNT] {
        [Some(v); FEATURE_COUNT]
    }

    #[test]
    fn missing_tokens() {
        for t in ["", "  ", "nan", "NaN", "NA", "null", "None"] {
            assert!(is_missing_token(t), "{t:?}");
        }
        assert!(!is_missing_token("0.0"));
    }

    #[test]
    fn required_gaps_drop_rows() {
        let mut gap = full(1.0);
        gap[FeatureId::StellarRadius.index()] = None;
        let mut optional_gap = full(2.0);
        optional_gap[FeatureId::ImpactParameter.index()] = None;

        let kept = drop_incomplete_required(vec![partial(gap), partial(optional_gap), partial(full(3.0))]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].values[0], Some(2.0));
    }

    #[test]
    fn median_is_taken_after_required_drop() {
        let slogg = FeatureId::StellarSurfaceGravity.index();

        // This row carries an extreme slogg but is dropped for a required gap,
        // so it must not pull the median.
        let mut dropped = full(1.0);
        dropped[0] = None;
        dropped[slogg] = Some(1000.0);

        let mut a = full(1.0);
        a[slogg] = Some(4.0);
        let mut b = full(1.0);
        b[slogg] = Some(5.0);
        let mut c = full(1.0);
        c[slogg] = None;

        let rows = drop_incomplete_required(vec![partial(dropped), partial(a), partial(b), partial(c)]);
        let (records, imputations) = impute_optional_with_median(rows).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[2].features.get(FeatureId::StellarSurfaceGravity), 4.5);
        assert_eq!(
            imputations,
            vec![Imputation {
                feature: FeatureId::StellarSurfaceGravity,
                median: 4.5,
                filled: 1
            }]
        );
    }

    #[test]
    fn optional_column_without_values_is_an_error() {
        let mut a = full(1.0);
        a[FeatureId::DispositionScore.index()] = None;
        let err = impute_optional_with_median(vec![partial(a)]).unwrap_err();
        assert!(matches!(
            err,
            DataIntegrityError::NoObservedValues(FeatureId::DispositionScore)
        ));
    }
}
