use strum::IntoEnumIterator;

use crate::artifacts::ArtifactBundle;
use crate::classifiers::{DecisionTree, ForestParams, RandomForest};
use crate::core::Disposition;
use crate::core::features::{FEATURE_COUNT, FeatureOrder, FeatureRow};
use crate::testing::synthetic::{cluster_center_fields, synthetic_records};
use crate::transform::{LabelEncoder, StandardScaler};

/// A complete, plausible set of inputs: the CONFIRMED cluster center.
pub fn sample_fields() -> Vec<(String, f64)> {
    cluster_center_fields(Disposition::Confirmed)
}

fn encoder() -> LabelEncoder {
    LabelEncoder::fit(Disposition::iter())
}

/// Small forest trained on the synthetic clusters.
pub fn tiny_bundle() -> ArtifactBundle {
    let records = synthetic_records(15, 3);
    let encoder = encoder();
    let order = FeatureOrder::canonical();
    let rows: Vec<FeatureRow> = records.iter().map(|r| r.features.ordered(&order)).collect();
    let labels: Vec<usize> = records
        .iter()
        .map(|r| encoder.encode(r.disposition).unwrap())
        .collect();
    let scaler = StandardScaler::fit(&rows);
    let params = ForestParams {
        n_trees: 5,
        ..ForestParams::default()
    };
    let forest = RandomForest::fit(&scaler.transform_all(&rows), &labels, 3, &params).unwrap();
    ArtifactBundle::new(forest, scaler, encoder, order).unwrap()
}

/// Bundle whose classifier returns `probabilities` (in encoder order:
/// CANDIDATE, CONFIRMED, FALSE POSITIVE) for every input.
pub fn constant_bundle(probabilities: [f64; 3]) -> ArtifactBundle {
    let forest = RandomForest::from_trees(
        ForestParams::default(),
        3,
        FEATURE_COUNT,
        vec![DecisionTree::leaf(probabilities.to_vec(), FEATURE_COUNT)],
    );
    let scaler = StandardScaler::fit(&[[-1.0; FEATURE_COUNT], [1.0; FEATURE_COUNT]]);
    ArtifactBundle::new(forest, scaler, encoder(), FeatureOrder::canonical()).unwrap()
}
