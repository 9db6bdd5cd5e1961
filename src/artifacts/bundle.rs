use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::artifacts::ConfigurationError;
use crate::classifiers::{Classifier, RandomForest};
use crate::core::Disposition;
use crate::core::features::{FEATURE_COUNT, FeatureOrder, FeatureVector};
use crate::transform::{LabelEncoder, StandardScaler};

pub const CLASSIFIER_FILE: &str = "exoplanet_classifier.json";
pub const SCALER_FILE: &str = "feature_scaler.json";
pub const ENCODER_FILE: &str = "label_encoder.json";
pub const FEATURE_NAMES_FILE: &str = "feature_names.txt";
pub const MANIFEST_FILE: &str = "manifest.json";

pub const ARTIFACT_FILES: [&str; 5] = [
    CLASSIFIER_FILE,
    SCALER_FILE,
    ENCODER_FILE,
    FEATURE_NAMES_FILE,
    MANIFEST_FILE,
];

const STAGING_PREFIX: &str = ".koi-artifacts-";
const PREVIOUS_PREFIX: &str = ".koi-previous-";

/// Identifies the save that produced a model directory. Every other
/// artifact is listed with its SHA-256 so files from different saves are
/// never loaded together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub run_id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub files: BTreeMap<String, String>,
}

impl Manifest {
    fn verify(&self, file: &str, bytes: &[u8]) -> Result<(), ConfigurationError> {
        match self.files.get(file) {
            Some(digest) if *digest == sha256_hex(bytes) => Ok(()),
            Some(_) => Err(ConfigurationError::Inconsistent(format!(
                "{file} was not written by run {}",
                self.run_id
            ))),
            None => Err(ConfigurationError::Inconsistent(format!(
                "manifest of run {} does not list {file}",
                self.run_id
            ))),
        }
    }
}

/// Summary of a loaded bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_type: &'static str,
    pub feature_names: Vec<String>,
    pub classes: Vec<&'static str>,
    pub n_features: usize,
    pub n_trees: usize,
}

/// Classifier, scaler, label encoder and feature order, always loaded and
/// saved together.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactBundle {
    classifier: RandomForest,
    scaler: StandardScaler,
    encoder: LabelEncoder,
    feature_order: FeatureOrder,
}

impl ArtifactBundle {
    pub fn new(
        classifier: RandomForest,
        scaler: StandardScaler,
        encoder: LabelEncoder,
        feature_order: FeatureOrder,
    ) -> Result<Self, ConfigurationError> {
        let bundle = Self {
            classifier,
            scaler,
            encoder,
            feature_order,
        };
        bundle.check_consistency()?;
        Ok(bundle)
    }

    pub fn classifier(&self) -> &RandomForest {
        &self.classifier
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    pub fn feature_order(&self) -> &FeatureOrder {
        &self.feature_order
    }

    /// Class probabilities for `features`, indexed by encoder class code.
    pub fn predict_proba(&self, features: &FeatureVector) -> Vec<f64> {
        let ordered = features.ordered(&self.feature_order);
        let scaled = self.scaler.transform(&ordered);
        self.classifier.get_votes_for_instance(&scaled)
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            model_type: "RandomForestClassifier",
            feature_names: self.feature_order.columns(),
            classes: self.encoder.classes().iter().map(|d| d.as_str()).collect(),
            n_features: self.classifier.number_of_features(),
            n_trees: self.classifier.trees().len(),
        }
    }

    /// Whether every artifact file exists in `dir`.
    pub fn exists_in(dir: &Path) -> bool {
        ARTIFACT_FILES.iter().all(|f| dir.join(f).is_file())
    }

    pub fn load(dir: &Path) -> Result<Self, ConfigurationError> {
        for file in ARTIFACT_FILES {
            let path = dir.join(file);
            if !path.is_file() {
                return Err(ConfigurationError::MissingArtifact(path));
            }
        }

        let classifier_bytes = read_bytes(&dir.join(CLASSIFIER_FILE))?;
        let scaler_bytes = read_bytes(&dir.join(SCALER_FILE))?;
        let encoder_bytes = read_bytes(&dir.join(ENCODER_FILE))?;
        let names_bytes = read_bytes(&dir.join(FEATURE_NAMES_FILE))?;

        let classifier: RandomForest = parse_json(&dir.join(CLASSIFIER_FILE), &classifier_bytes)?;
        let scaler: StandardScaler = parse_json(&dir.join(SCALER_FILE), &scaler_bytes)?;
        let encoder: LabelEncoder = parse_json(&dir.join(ENCODER_FILE), &encoder_bytes)?;
        let names_path = dir.join(FEATURE_NAMES_FILE);
        let feature_order = FeatureOrder::parse(&String::from_utf8_lossy(&names_bytes))
            .map_err(|source| ConfigurationError::FeatureOrder {
                path: names_path,
                source,
            })?;

        let manifest = Self::read_manifest(dir)?;
        manifest.verify(CLASSIFIER_FILE, &classifier_bytes)?;
        manifest.verify(SCALER_FILE, &scaler_bytes)?;
        manifest.verify(ENCODER_FILE, &encoder_bytes)?;
        manifest.verify(FEATURE_NAMES_FILE, &names_bytes)?;

        let bundle = Self::new(classifier, scaler, encoder, feature_order)?;
        log::info!(
            "loaded model from {} (run {}, {} trees, classes {:?})",
            dir.display(),
            manifest.run_id,
            bundle.classifier.trees().len(),
            bundle.info().classes
        );
        Ok(bundle)
    }

    /// The manifest written by the last save into `dir`.
    pub fn read_manifest(dir: &Path) -> Result<Manifest, ConfigurationError> {
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(ConfigurationError::MissingArtifact(path));
        }
        parse_json(&path, &read_bytes(&path)?)
    }

    /// Writes every artifact plus a manifest into a staging directory next
    /// to `dir`, then swaps the staging directory in for `dir`.
    ///
    /// An existing `dir` is first renamed aside, so the path never holds
    /// files from two saves. Entries of the previous directory that are not
    /// artifacts are moved into the new one before the old directory is
    /// removed. Returns the manifest that was written.
    pub fn save(&self, dir: &Path) -> Result<Manifest, ConfigurationError> {
        let parent = match dir.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| ConfigurationError::io(&parent, e))?;

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&parent)
            .map_err(|e| ConfigurationError::io(&parent, e))?;

        let payload = [
            (CLASSIFIER_FILE, to_json(CLASSIFIER_FILE, &self.classifier)?),
            (SCALER_FILE, to_json(SCALER_FILE, &self.scaler)?),
            (ENCODER_FILE, to_json(ENCODER_FILE, &self.encoder)?),
            (FEATURE_NAMES_FILE, self.feature_order.to_text().into_bytes()),
        ];
        let mut files = BTreeMap::new();
        for (file, bytes) in &payload {
            let path = staging.path().join(file);
            fs::write(&path, bytes).map_err(|e| ConfigurationError::io(&path, e))?;
            files.insert(file.to_string(), sha256_hex(bytes));
        }
        let manifest = Manifest {
            run_id: Uuid::new_v4(),
            saved_at: Utc::now(),
            files,
        };
        let manifest_path = staging.path().join(MANIFEST_FILE);
        let manifest_json = serde_json::to_vec_pretty(&manifest).map_err(|source| {
            ConfigurationError::Corrupt {
                path: manifest_path.clone(),
                source,
            }
        })?;
        fs::write(&manifest_path, manifest_json)
            .map_err(|e| ConfigurationError::io(&manifest_path, e))?;

        let staged = staging.keep();
        if let Err(e) = swap_into_place(&staged, dir, &parent, manifest.run_id) {
            let _ = fs::remove_dir_all(&staged);
            return Err(e);
        }
        log::info!(
            "saved model artifacts to {} (run {})",
            dir.display(),
            manifest.run_id
        );
        Ok(manifest)
    }

    fn check_consistency(&self) -> Result<(), ConfigurationError> {
        let inconsistent = |msg: String| Err(ConfigurationError::Inconsistent(msg));

        let expected: Vec<Disposition> = {
            let mut all: Vec<Disposition> = Disposition::iter().collect();
            all.sort_by_key(|d| d.as_str());
            all
        };
        if self.encoder.classes() != expected.as_slice() {
            return inconsistent(format!(
                "label encoder holds {:?}, expected all three dispositions",
                self.encoder.classes()
            ));
        }
        if self.feature_order.len() != FEATURE_COUNT {
            return inconsistent(format!(
                "feature order has {} names",
                self.feature_order.len()
            ));
        }
        if !self.scaler.is_valid() {
            return inconsistent("scaler parameters are not finite and positive".into());
        }
        if self.classifier.number_of_features() != FEATURE_COUNT {
            return inconsistent(format!(
                "classifier expects {} features, not {FEATURE_COUNT}",
                self.classifier.number_of_features()
            ));
        }
        if self.classifier.number_of_classes() != self.encoder.len() {
            return inconsistent(format!(
                "classifier has {} classes but the encoder has {}",
                self.classifier.number_of_classes(),
                self.encoder.len()
            ));
        }
        self.classifier
            .validate()
            .map_err(ConfigurationError::Inconsistent)
    }
}

fn swap_into_place(
    staged: &Path,
    dir: &Path,
    parent: &Path,
    run_id: Uuid,
) -> Result<(), ConfigurationError> {
    if !dir.exists() {
        return fs::rename(staged, dir).map_err(|e| ConfigurationError::io(dir, e));
    }

    let previous = parent.join(format!("{PREVIOUS_PREFIX}{run_id}"));
    fs::rename(dir, &previous).map_err(|e| ConfigurationError::io(dir, e))?;
    if let Err(e) = fs::rename(staged, dir) {
        let _ = fs::rename(&previous, dir);
        return Err(ConfigurationError::io(dir, e));
    }

    let entries = fs::read_dir(&previous).map_err(|e| ConfigurationError::io(&previous, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ConfigurationError::io(&previous, e))?;
        let name = entry.file_name();
        if ARTIFACT_FILES.iter().any(|f| name == *f) {
            continue;
        }
        let target = dir.join(&name);
        fs::rename(entry.path(), &target).map_err(|e| ConfigurationError::io(&target, e))?;
    }
    fs::remove_dir_all(&previous).map_err(|e| ConfigurationError::io(&previous, e))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ConfigurationError> {
    fs::read(path).map_err(|e| ConfigurationError::io(path, e))
}

fn parse_json<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<T, ConfigurationError> {
    serde_json::from_slice(bytes).map_err(|source| ConfigurationError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

fn to_json<T: Serialize>(file: &str, value: &T) -> Result<Vec<u8>, ConfigurationError> {
    serde_json::to_vec(value).map_err(|source| ConfigurationError::Corrupt {
        path: PathBuf::from(file),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::{constant_bundle, tiny_bundle};
    use tempfile::tempdir;

    fn leftover_siblings(parent: &Path) -> usize {
        fs::read_dir(parent)
            .unwrap()
            .filter(|e| {
                let name = e.as_ref().unwrap().file_name();
                let name = name.to_string_lossy();
                name.starts_with(STAGING_PREFIX) || name.starts_with(PREVIOUS_PREFIX)
            })
            .count()
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("models");
        let bundle = tiny_bundle();

        let manifest = bundle.save(&dir).unwrap();
        for file in ARTIFACT_FILES {
            assert!(dir.join(file).is_file(), "{file} missing");
        }
        assert_eq!(manifest.files.len(), ARTIFACT_FILES.len() - 1);
        assert_eq!(ArtifactBundle::read_manifest(&dir).unwrap(), manifest);

        let loaded = ArtifactBundle::load(&dir).unwrap();
        assert_eq!(loaded, bundle);
        assert_eq!(
            loaded.encoder().classes(),
            &[
                Disposition::Candidate,
                Disposition::Confirmed,
                Disposition::FalsePositive
            ]
        );
        assert_eq!(
            loaded.encoder().encode(Disposition::FalsePositive),
            bundle.encoder().encode(Disposition::FalsePositive)
        );
        assert_eq!(loaded.encoder().encode(Disposition::FalsePositive), Some(2));
        assert_eq!(loaded.encoder().decode(2), Some(Disposition::FalsePositive));
        assert_eq!(loaded.encoder().decode(2), bundle.encoder().decode(2));
        assert_eq!(leftover_siblings(tmp.path()), 0);
    }

    #[test]
    fn resave_swaps_the_whole_directory_and_keeps_other_files() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("models");
        let first = tiny_bundle().save(&dir).unwrap();
        fs::write(dir.join("notes.txt"), "keep me").unwrap();

        let replacement = constant_bundle([0.2, 0.3, 0.5]);
        let second = replacement.save(&dir).unwrap();
        assert_ne!(first.run_id, second.run_id);

        assert_eq!(ArtifactBundle::load(&dir).unwrap(), replacement);
        assert_eq!(fs::read_to_string(dir.join("notes.txt")).unwrap(), "keep me");
        assert_eq!(leftover_siblings(tmp.path()), 0);
    }

    #[test]
    fn files_from_different_saves_are_rejected() {
        let tmp = tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        tiny_bundle().save(&a).unwrap();
        constant_bundle([0.2, 0.3, 0.5]).save(&b).unwrap();

        fs::copy(b.join(SCALER_FILE), a.join(SCALER_FILE)).unwrap();
        assert!(matches!(
            ArtifactBundle::load(&a),
            Err(ConfigurationError::Inconsistent(_))
        ));
    }

    #[test]
    fn a_model_directory_without_manifest_is_incomplete() {
        let tmp = tempdir().unwrap();
        tiny_bundle().save(tmp.path()).unwrap();
        fs::remove_file(tmp.path().join(MANIFEST_FILE)).unwrap();
        assert!(ArtifactBundle::load(tmp.path()).unwrap_err().is_missing());
    }

    #[test]
    fn feature_names_file_is_newline_delimited_columns() {
        let tmp = tempdir().unwrap();
        tiny_bundle().save(tmp.path()).unwrap();
        let text = fs::read_to_string(tmp.path().join(FEATURE_NAMES_FILE)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), FEATURE_COUNT);
        assert_eq!(lines[0], "koi_period");
        assert_eq!(lines[FEATURE_COUNT - 1], "koi_slogg");
    }

    #[test]
    fn missing_file_is_reported() {
        let tmp = tempdir().unwrap();
        tiny_bundle().save(tmp.path()).unwrap();
        fs::remove_file(tmp.path().join(SCALER_FILE)).unwrap();
        assert!(!ArtifactBundle::exists_in(tmp.path()));
        let err = ArtifactBundle::load(tmp.path()).unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn corrupt_files_are_configuration_errors() {
        let tmp = tempdir().unwrap();
        tiny_bundle().save(tmp.path()).unwrap();
        fs::write(tmp.path().join(CLASSIFIER_FILE), "{ not json").unwrap();
        assert!(matches!(
            ArtifactBundle::load(tmp.path()),
            Err(ConfigurationError::Corrupt { .. })
        ));

        let tmp = tempdir().unwrap();
        tiny_bundle().save(tmp.path()).unwrap();
        fs::write(tmp.path().join(FEATURE_NAMES_FILE), "koi_period\nkoi_depth\n").unwrap();
        assert!(matches!(
            ArtifactBundle::load(tmp.path()),
            Err(ConfigurationError::FeatureOrder { .. })
        ));

        let tmp = tempdir().unwrap();
        tiny_bundle().save(tmp.path()).unwrap();
        fs::write(tmp.path().join(ENCODER_FILE), r#"{"classes":["CONFIRMED"]}"#).unwrap();
        assert!(matches!(
            ArtifactBundle::load(tmp.path()),
            Err(ConfigurationError::Inconsistent(_))
        ));
    }

    #[test]
    fn info_describes_the_model() {
        let info = tiny_bundle().info();
        assert_eq!(info.model_type, "RandomForestClassifier");
        assert_eq!(info.n_features, FEATURE_COUNT);
        assert_eq!(info.classes, vec!["CANDIDATE", "CONFIRMED", "FALSE POSITIVE"]);
        assert_eq!(info.feature_names[2], "koi_depth");
    }
}
