use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_n_trees() -> usize {
    100
}
fn default_max_depth() -> Option<usize> {
    Some(10)
}
fn default_min_samples_split() -> usize {
    5
}
fn default_min_samples_leaf() -> usize {
    1
}
fn default_seed() -> u64 {
    42
}

/// How many features each split may consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MaxFeatures {
    #[default]
    Sqrt,
    Log2,
    All,
    Fixed(usize),
}

impl MaxFeatures {
    /// Number of candidate features for `n_features` inputs, at least 1.
    pub fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2().floor() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Fixed(k) => k,
        };
        k.clamp(1, n_features.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForestParams {
    #[serde(default = "default_n_trees")]
    #[schemars(
        title = "Trees",
        description = "Number of trees in the ensemble.",
        range(min = 1)
    )]
    pub n_trees: usize,

    #[serde(default = "default_max_depth")]
    #[schemars(
        title = "Max Depth",
        description = "Maximum tree depth (None = grow until leaves are pure)."
    )]
    pub max_depth: Option<usize>,

    #[serde(default = "default_min_samples_split")]
    #[schemars(
        title = "Min Samples Split",
        description = "Minimum samples required to split an internal node.",
        range(min = 2)
    )]
    pub min_samples_split: usize,

    #[serde(default = "default_min_samples_leaf")]
    #[schemars(
        title = "Min Samples Leaf",
        description = "Minimum samples required in each leaf.",
        range(min = 1)
    )]
    pub min_samples_leaf: usize,

    #[serde(default)]
    #[schemars(
        title = "Max Features",
        description = "Features considered per split."
    )]
    pub max_features: MaxFeatures,

    #[serde(default = "default_seed")]
    #[schemars(title = "Seed", description = "PRNG seed for bootstrap and feature sampling.")]
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: default_n_trees(),
            max_depth: default_max_depth(),
            min_samples_split: default_min_samples_split(),
            min_samples_leaf: default_min_samples_leaf(),
            max_features: MaxFeatures::default(),
            seed: default_seed(),
        }
    }
}
