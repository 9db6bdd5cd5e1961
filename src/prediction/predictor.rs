use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::artifacts::{ArtifactBundle, ConfigurationError, ModelInfo};
use crate::classifiers::classifier::argmax;
use crate::core::features::FeatureVector;
use crate::prediction::{
    ClassProbability, ConfidenceScores, PredictError, PredictionResult, RawPrediction,
};

#[derive(Debug, Clone)]
enum State {
    Unready,
    Ready(Arc<ArtifactBundle>),
}

/// Serves predictions from a loaded artifact bundle.
///
/// Starts `Unready` when the artifacts cannot be loaded; every prediction
/// then fails with [`PredictError::ModelNotLoaded`] until [`reload`]
/// succeeds. The bundle is shared read-only, so a `Predictor` can be used
/// from many threads.
///
/// [`reload`]: Predictor::reload
#[derive(Debug, Clone)]
pub struct Predictor {
    model_dir: PathBuf,
    state: State,
}

impl Predictor {
    /// Loads artifacts from `model_dir`, logging and staying `Unready` on
    /// any failure.
    pub fn load<P: AsRef<Path>>(model_dir: P) -> Self {
        let model_dir = model_dir.as_ref().to_path_buf();
        let state = match ArtifactBundle::load(&model_dir) {
            Ok(bundle) => State::Ready(Arc::new(bundle)),
            Err(e) if e.is_missing() => {
                log::warn!("model not loaded: {e}");
                State::Unready
            }
            Err(e) => {
                log::error!("model not loaded: {e}");
                State::Unready
            }
        };
        Self { model_dir, state }
    }

    pub fn try_load<P: AsRef<Path>>(model_dir: P) -> Result<Self, ConfigurationError> {
        let model_dir = model_dir.as_ref().to_path_buf();
        let bundle = ArtifactBundle::load(&model_dir)?;
        Ok(Self {
            model_dir,
            state: State::Ready(Arc::new(bundle)),
        })
    }

    pub fn from_bundle<P: AsRef<Path>>(model_dir: P, bundle: ArtifactBundle) -> Self {
        Self {
            model_dir: model_dir.as_ref().to_path_buf(),
            state: State::Ready(Arc::new(bundle)),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// Loads the artifacts again. On failure the predictor becomes
    /// `Unready`.
    pub fn reload(&mut self) -> Result<(), ConfigurationError> {
        match ArtifactBundle::load(&self.model_dir) {
            Ok(bundle) => {
                self.state = State::Ready(Arc::new(bundle));
                Ok(())
            }
            Err(e) => {
                self.state = State::Unready;
                Err(e)
            }
        }
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, PredictError> {
        let bundle = self.ready()?;
        let probabilities = bundle.predict_proba(features);
        let scores = ConfidenceScores::merge(bundle.encoder().classes(), &probabilities);
        let result = PredictionResult::from_scores(scores, bundle.feature_order().columns());
        log::debug!(
            "prediction {} ({:.3})",
            result.verdict,
            result.max_confidence
        );
        Ok(result)
    }

    /// Validates a JSON object of feature values, then predicts.
    pub fn predict_json(&self, input: &Value) -> Result<PredictionResult, PredictError> {
        self.ready()?;
        self.predict(&FeatureVector::from_json(input)?)
    }

    pub fn predict_raw(&self, features: &FeatureVector) -> Result<RawPrediction, PredictError> {
        let bundle = self.ready()?;
        let probabilities = bundle.predict_proba(features);
        let classes = bundle.encoder().classes();
        let label = argmax(&probabilities)
            .and_then(|code| bundle.encoder().decode(code))
            .unwrap_or(classes[0]);
        Ok(RawPrediction {
            label,
            probabilities: classes
                .iter()
                .zip(probabilities)
                .map(|(&class, probability)| ClassProbability { class, probability })
                .collect(),
        })
    }

    pub fn info(&self) -> Result<ModelInfo, PredictError> {
        Ok(self.ready()?.info())
    }

    fn ready(&self) -> Result<&ArtifactBundle, PredictError> {
        match &self.state {
            State::Ready(bundle) => Ok(bundle),
            State::Unready => Err(PredictError::ModelNotLoaded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::{FeatureId, ValidationError};
    use crate::core::{Disposition, Verdict};
    use crate::testing::fixtures::{constant_bundle, sample_fields, tiny_bundle};
    use serde_json::json;
    use std::fs;
    use strum::IntoEnumIterator;
    use tempfile::tempdir;

    fn sample() -> FeatureVector {
        FeatureVector::from_fields(sample_fields()).unwrap()
    }

    #[test]
    fn unready_predictor_reports_model_not_loaded() {
        let tmp = tempdir().unwrap();
        let predictor = Predictor::load(tmp.path().join("missing"));
        assert!(!predictor.is_ready());
        assert_eq!(predictor.predict(&sample()), Err(PredictError::ModelNotLoaded));
        assert_eq!(predictor.predict_raw(&sample()).unwrap_err(), PredictError::ModelNotLoaded);
        assert_eq!(predictor.info().unwrap_err(), PredictError::ModelNotLoaded);
        // readiness is checked before validation
        assert_eq!(
            predictor.predict_json(&json!({})),
            Err(PredictError::ModelNotLoaded)
        );
    }

    #[test]
    fn reload_picks_up_saved_artifacts() {
        let tmp = tempdir().unwrap();
        let mut predictor = Predictor::load(tmp.path());
        assert!(!predictor.is_ready());

        tiny_bundle().save(tmp.path()).unwrap();
        predictor.reload().unwrap();
        assert!(predictor.is_ready());
        assert!(predictor.predict(&sample()).is_ok());

        fs::remove_file(tmp.path().join(crate::artifacts::SCALER_FILE)).unwrap();
        assert!(predictor.reload().unwrap_err().is_missing());
        assert!(!predictor.is_ready());
    }

    #[test]
    fn corrupt_artifacts_fail_explicit_load_and_leave_lenient_load_unready() {
        let tmp = tempdir().unwrap();
        tiny_bundle().save(tmp.path()).unwrap();
        fs::write(tmp.path().join(crate::artifacts::SCALER_FILE), "[]").unwrap();

        assert!(matches!(
            Predictor::try_load(tmp.path()),
            Err(ConfigurationError::Corrupt { .. })
        ));
        assert!(!Predictor::load(tmp.path()).is_ready());
    }

    #[test]
    fn confidences_sum_to_one() {
        let predictor = Predictor::from_bundle(".", tiny_bundle());
        let result = predictor.predict(&sample()).unwrap();
        let s = result.confidence_scores;
        assert!((s.confirmed_or_candidate + s.false_positive - 1.0).abs() < 1e-6);
        assert!(result.max_confidence >= 0.5);
        assert_eq!(result.features_used.len(), 12);
        assert_eq!(result.features_used[0], "koi_period");
    }

    #[test]
    fn tie_between_merged_outcomes_is_false_positive() {
        // CANDIDATE, CONFIRMED, FALSE POSITIVE
        let predictor = Predictor::from_bundle(".", constant_bundle([0.25, 0.25, 0.5]));
        let result = predictor.predict(&sample()).unwrap();
        assert_eq!(result.verdict, Verdict::FalsePositive);
        assert_eq!(result.max_confidence, 0.5);

        let predictor = Predictor::from_bundle(".", constant_bundle([0.25, 0.375, 0.375]));
        let result = predictor.predict(&sample()).unwrap();
        assert_eq!(result.verdict, Verdict::ConfirmedOrCandidate);
        assert_eq!(result.max_confidence, 0.625);
    }

    #[test]
    fn raw_prediction_keeps_all_three_classes() {
        let predictor = Predictor::from_bundle(".", constant_bundle([0.125, 0.5, 0.375]));
        let raw = predictor.predict_raw(&sample()).unwrap();
        assert_eq!(raw.label, Disposition::Confirmed);
        assert_eq!(raw.probabilities.len(), 3);
        assert_eq!(raw.probabilities[2].class, Disposition::FalsePositive);
        assert_eq!(raw.probabilities[2].probability, 0.375);
    }

    #[test]
    fn omitted_optional_feature_equals_zero() {
        let predictor = Predictor::from_bundle(".", tiny_bundle());
        for optional in FeatureId::optional() {
            let without: Vec<(String, f64)> = sample_fields()
                .into_iter()
                .filter(|(k, _)| k != optional.key())
                .collect();
            let mut with_zero = without.clone();
            with_zero.push((optional.key().to_string(), 0.0));

            let a = predictor
                .predict(&FeatureVector::from_fields(without).unwrap())
                .unwrap();
            let b = predictor
                .predict(&FeatureVector::from_fields(with_zero).unwrap())
                .unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn missing_required_feature_is_named() {
        let predictor = Predictor::from_bundle(".", tiny_bundle());
        for required in FeatureId::required() {
            let mut input = serde_json::Map::new();
            for (k, v) in sample_fields() {
                if k != required.key() {
                    input.insert(k, json!(v));
                }
            }
            assert_eq!(
                predictor.predict_json(&Value::Object(input)),
                Err(PredictError::Validation(ValidationError::MissingFeature(
                    required
                )))
            );
        }
        assert_eq!(FeatureId::iter().filter(|f| f.is_required()).count(), 9);
    }

    #[test]
    fn predictor_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Predictor>();
    }
}
