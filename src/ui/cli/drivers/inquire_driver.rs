use crate::ui::cli::drivers::PromptDriver;
use anyhow::Result;
use inquire::{Confirm, CustomType, Text, validator::Validation};

pub struct InquireDriver;

impl PromptDriver for InquireDriver {
    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new(title)
            .with_default(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn ask_f64(
        &self,
        title: &str,
        help: &str,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<f64> {
        let q = CustomType::<f64>::new(title)
            .with_help_message(help)
            .with_error_message("Please type a number")
            .with_validator(move |x: &f64| {
                if !x.is_finite() {
                    return Ok(Validation::Invalid("Must be a finite number".into()));
                }
                match (min, max) {
                    (Some(lo), _) if *x < lo => {
                        Ok(Validation::Invalid(format!("Must be ≥ {lo}").into()))
                    }
                    (_, Some(hi)) if *x > hi => {
                        Ok(Validation::Invalid(format!("Must be ≤ {hi}").into()))
                    }
                    _ => Ok(Validation::Valid),
                }
            });

        Ok(q.prompt()?)
    }

    fn ask_optional_f64(&self, title: &str, help: &str) -> Result<Option<f64>> {
        let answer = Text::new(title)
            .with_help_message(help)
            .with_validator(|s: &str| {
                let s = s.trim();
                if s.is_empty() || s.parse::<f64>().is_ok_and(f64::is_finite) {
                    Ok(Validation::Valid)
                } else {
                    Ok(Validation::Invalid("Must be a number or empty".into()))
                }
            })
            .prompt()?;

        let answer = answer.trim();
        if answer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(answer.parse()?))
        }
    }
}
