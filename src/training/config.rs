use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classifiers::ForestParams;
use crate::training::TrainError;

fn default_test_fraction() -> f64 {
    0.2
}
fn default_seed() -> u64 {
    42
}
fn default_cv_folds() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrainingConfig {
    #[serde(default = "default_test_fraction")]
    #[schemars(
        title = "Test Fraction",
        description = "Share of each class held out for evaluation.",
        range(min = 0.0, max = 1.0)
    )]
    pub test_fraction: f64,

    #[serde(default = "default_seed")]
    #[schemars(title = "Seed", description = "PRNG seed for the split and the cross-validation folds.")]
    pub seed: u64,

    #[serde(default = "default_cv_folds")]
    #[schemars(
        title = "Cross-Validation Folds",
        description = "Stratified folds over the training partition.",
        range(min = 2)
    )]
    pub cv_folds: usize,

    #[serde(default)]
    #[schemars(title = "Forest", description = "Random forest hyperparameters.")]
    pub forest: ForestParams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: default_test_fraction(),
            seed: default_seed(),
            cv_folds: default_cv_folds(),
            forest: ForestParams::default(),
        }
    }
}

impl TrainingConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TrainError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TrainError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: TrainingConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TrainError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(TrainError::Config(format!(
                "test_fraction must be strictly between 0 and 1, got {}",
                self.test_fraction
            )));
        }
        if self.cv_folds < 2 {
            return Err(TrainError::Config("cv_folds must be at least 2".into()));
        }
        if self.forest.n_trees == 0 {
            return Err(TrainError::Config("forest.n_trees must be at least 1".into()));
        }
        if self.forest.min_samples_leaf == 0 {
            return Err(TrainError::Config("forest.min_samples_leaf must be at least 1".into()));
        }
        Ok(())
    }

    pub fn schema() -> schemars::Schema {
        schemars::schema_for!(TrainingConfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{"forest": {"n_trees": 10}}"#).unwrap();
        assert_eq!(config.test_fraction, 0.2);
        assert_eq!(config.seed, 42);
        assert_eq!(config.cv_folds, 5);
        assert_eq!(config.forest.n_trees, 10);
        assert_eq!(config.forest.max_depth, Some(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reads_and_validates_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"test_fraction": 1.5}"#).unwrap();
        assert!(matches!(
            TrainingConfig::from_path(file.path()),
            Err(TrainError::Config(_))
        ));

        std::fs::write(file.path(), r#"{"cv_folds": 3}"#).unwrap();
        assert_eq!(TrainingConfig::from_path(file.path()).unwrap().cv_folds, 3);

        std::fs::write(file.path(), "not json").unwrap();
        assert!(matches!(
            TrainingConfig::from_path(file.path()),
            Err(TrainError::Json(_))
        ));
    }

    #[test]
    fn schema_lists_fields() {
        let schema = serde_json::to_value(TrainingConfig::schema()).unwrap();
        let props = schema["properties"].as_object().unwrap();
        for field in ["test_fraction", "seed", "cv_folds", "forest"] {
            assert!(props.contains_key(field), "{field} missing from schema");
        }
    }
}
