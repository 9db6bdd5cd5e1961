use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strum::IntoEnumIterator;

use crate::core::features::{FEATURE_COUNT, FeatureId, FeatureVector, TARGET_COLUMN};
use crate::core::{Disposition, LabeledRecord, TrainingDataset};

/// Relative half-width of the uniform noise around each cluster center.
const NOISE: f64 = 0.05;

/// Cluster center per disposition, in schema order. The three centers are
/// far apart on every feature.
pub fn cluster_center(disposition: Disposition) -> [f64; FEATURE_COUNT] {
    match disposition {
        Disposition::Confirmed => [
            10.0, 3.0, 500.0, 2.0, 600.0, 50.0, 30.0, 5500.0, 1.0, 0.3, 0.95, 4.4,
        ],
        Disposition::Candidate => [
            40.0, 6.0, 1500.0, 5.0, 900.0, 150.0, 60.0, 6000.0, 1.5, 0.5, 0.6, 4.2,
        ],
        Disposition::FalsePositive => [
            100.0, 12.0, 5000.0, 20.0, 1500.0, 800.0, 200.0, 6500.0, 2.5, 0.9, 0.05, 3.9,
        ],
    }
}

/// The cluster center as `(public key, value)` pairs.
pub fn cluster_center_fields(disposition: Disposition) -> Vec<(String, f64)> {
    let center = cluster_center(disposition);
    FeatureId::iter()
        .map(|id| (id.key().to_string(), center[id.index()]))
        .collect()
}

pub fn synthetic_records(per_class: usize, seed: u64) -> Vec<LabeledRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(per_class * 3);
    for _ in 0..per_class {
        for disposition in Disposition::iter() {
            let mut values = cluster_center(disposition);
            for v in values.iter_mut() {
                *v *= 1.0 + rng.random_range(-NOISE..NOISE);
            }
            records.push(LabeledRecord::new(
                FeatureVector::from_values(values),
                disposition,
            ));
        }
    }
    records
}

pub fn synthetic_dataset(per_class: usize, seed: u64) -> TrainingDataset {
    TrainingDataset::new(synthetic_records(per_class, seed))
}

/// Catalogue-style CSV of the synthetic clusters: comment preamble, extra
/// identifier columns, a few rows with unusable dispositions and some
/// missing optional cells.
pub fn synthetic_csv(per_class: usize, seed: u64) -> String {
    let mut out = String::from("# KOI cumulative table\n# synthetic rows\n");
    let mut header = vec!["kepid".to_string(), "kepoi_name".to_string()];
    header.push(TARGET_COLUMN.to_string());
    header.extend(FeatureId::iter().map(|id| id.column().to_string()));
    out.push_str(&header.join(","));
    out.push('\n');

    for (i, record) in synthetic_records(per_class, seed).iter().enumerate() {
        let mut cells = vec![
            (10_000 + i).to_string(),
            format!("\"K{i:05}.01\""),
            record.disposition.as_str().to_string(),
        ];
        for id in FeatureId::iter() {
            if !id.is_required() && i % 7 == 3 {
                cells.push(String::new());
            } else {
                cells.push(record.features.get(id).to_string());
            }
        }
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    for i in 0..3 {
        let mut cells = vec![format!("{}", 90_000 + i), String::new(), "NOT DISPOSITIONED".into()];
        cells.extend(std::iter::repeat_n("1.0".to_string(), FEATURE_COUNT));
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}
