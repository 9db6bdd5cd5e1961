use anyhow::{Context, Result};
use strum::IntoEnumIterator;

use crate::core::features::{FeatureId, FeatureVector, OPTIONAL_FEATURE_DEFAULT};
use crate::prediction::{PredictionResult, Predictor};
use crate::ui::cli::drivers::PromptDriver;

/// Asks for every feature in schema order. Required features must be
/// answered; optional ones may be left empty.
pub fn prompt_features(driver: &dyn PromptDriver) -> Result<FeatureVector> {
    let mut fields: Vec<(&'static str, f64)> = Vec::new();
    for id in FeatureId::iter() {
        if id.is_required() {
            let v = driver.ask_f64(id.title(), &format!("{} (required)", id.column()), None, None)?;
            fields.push((id.key(), v));
        } else {
            let help = format!(
                "{} (optional, leave empty for {OPTIONAL_FEATURE_DEFAULT})",
                id.column()
            );
            if let Some(v) = driver.ask_optional_f64(id.title(), &help)? {
                fields.push((id.key(), v));
            }
        }
    }
    Ok(FeatureVector::from_fields(fields)?)
}

/// Prompts, predicts and hands each result to `on_result` until the user
/// declines to continue. Returns the number of predictions made.
pub fn interactive_session<F>(
    driver: &dyn PromptDriver,
    predictor: &Predictor,
    mut on_result: F,
) -> Result<usize>
where
    F: FnMut(&PredictionResult) -> Result<()>,
{
    let mut made = 0;
    loop {
        let features = prompt_features(driver)?;
        let result = predictor
            .predict(&features)
            .context("prediction failed")?;
        on_result(&result)?;
        made += 1;
        if !driver.ask_bool("Classify another candidate?", "", false)? {
            return Ok(made);
        }
    }
}
