use crate::core::features::{FEATURE_COUNT, FeatureId, FeatureOrder, ValidationError};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Value substituted for an optional feature the caller did not supply.
pub const OPTIONAL_FEATURE_DEFAULT: f64 = 0.0;

/// Complete, validated set of the twelve features, stored in schema order.
///
/// Construct one from caller input with [`FeatureVector::from_fields`] or
/// [`FeatureVector::from_json`]; both enforce the required/optional split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Wraps already-complete values given in schema order.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Validating factory over `(key, value)` pairs.
    ///
    /// Keys may be public keys or catalogue column names; unknown keys are
    /// ignored. Every required feature must appear with a finite value,
    /// missing optional features default to [`OPTIONAL_FEATURE_DEFAULT`].
    pub fn from_fields<I, K>(fields: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut slots: [Option<f64>; FEATURE_COUNT] = [None; FEATURE_COUNT];
        for (key, value) in fields {
            let Some(id) = FeatureId::from_key(key.as_ref()) else {
                continue;
            };
            if !value.is_finite() {
                return Err(ValidationError::NonNumeric {
                    feature: id,
                    value: value.to_string(),
                });
            }
            slots[id.index()] = Some(value);
        }
        Self::complete(slots)
    }

    /// Validating factory over a JSON object such as a request body.
    ///
    /// Numbers and numeric strings are accepted. `null` counts as absent.
    pub fn from_json(input: &Value) -> Result<Self, ValidationError> {
        let object = input.as_object().ok_or(ValidationError::NotAnObject)?;
        let mut slots: [Option<f64>; FEATURE_COUNT] = [None; FEATURE_COUNT];
        for (key, raw) in object {
            let Some(id) = FeatureId::from_key(key) else {
                continue;
            };
            let value = match raw {
                Value::Null => continue,
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            match value {
                Some(v) if v.is_finite() => slots[id.index()] = Some(v),
                _ => {
                    return Err(ValidationError::NonNumeric {
                        feature: id,
                        value: raw.to_string(),
                    });
                }
            }
        }
        Self::complete(slots)
    }

    fn complete(slots: [Option<f64>; FEATURE_COUNT]) -> Result<Self, ValidationError> {
        let mut values = [OPTIONAL_FEATURE_DEFAULT; FEATURE_COUNT];
        for id in FeatureId::iter() {
            match slots[id.index()] {
                Some(v) => values[id.index()] = v,
                None if id.is_required() => return Err(ValidationError::MissingFeature(id)),
                None => {}
            }
        }
        Ok(Self { values })
    }

    pub fn get(&self, id: FeatureId) -> f64 {
        self.values[id.index()]
    }

    /// Values in schema order.
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Values rearranged into the given feature order.
    pub fn ordered(&self, order: &FeatureOrder) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for (slot, id) in out.iter_mut().zip(order.iter()) {
            *slot = self.get(id);
        }
        out
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map: BTreeMap<&'static str, f64> =
            FeatureId::iter().map(|id| (id.key(), self.get(id))).collect();
        map.serialize(serializer)
    }
}
