use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};

use koi_classifier::prediction::{PredictionResult, Predictor};
use koi_classifier::preprocessing::DataPreprocessor;
use koi_classifier::training::{ModelTrainer, TrainingConfig};
use koi_classifier::ui::cli::drivers::InquireDriver;
use koi_classifier::ui::cli::interactive_session;

#[derive(Parser)]
#[command(name = "koi", about = "Kepler Object of Interest disposition classifier")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Preprocess a KOI table, train the forest and write the artifacts.
    Train {
        /// KOI cumulative table (comma-separated, `#` comment lines allowed).
        #[arg(long)]
        data: PathBuf,

        #[arg(long, default_value = "models")]
        model_dir: PathBuf,

        /// JSON training configuration; omitted fields keep their defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Classify one candidate from a JSON object or interactive prompts.
    Predict {
        #[arg(long, default_value = "models")]
        model_dir: PathBuf,

        /// JSON file holding a feature object.
        #[arg(long, conflicts_with = "interactive")]
        input: Option<PathBuf>,

        #[arg(long)]
        interactive: bool,
    },

    /// Print the type, classes and feature order of a saved model.
    Info {
        #[arg(long, default_value = "models")]
        model_dir: PathBuf,
    },

    /// Print the JSON schema of the training configuration.
    Schema,
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let cli = Cli::parse();

    match cli.command {
        Command::Train {
            data,
            model_dir,
            config,
        } => train(data, model_dir, config),
        Command::Predict {
            model_dir,
            input,
            interactive,
        } => predict(model_dir, input, interactive),
        Command::Info { model_dir } => {
            let predictor = Predictor::try_load(&model_dir)
                .with_context(|| format!("failed to load model from {}", model_dir.display()))?;
            println!("{}", serde_json::to_string_pretty(&predictor.info()?)?);
            Ok(())
        }
        Command::Schema => {
            println!(
                "{}",
                serde_json::to_string_pretty(&TrainingConfig::schema())?
            );
            Ok(())
        }
    }
}

fn train(data: PathBuf, model_dir: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = match config {
        Some(path) => TrainingConfig::from_path(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => TrainingConfig::default(),
    };

    let preprocessed = DataPreprocessor::new()
        .load_path(&data)
        .with_context(|| format!("failed to preprocess {}", data.display()))?;
    let trained = ModelTrainer::new(config)
        .train_and_save(
            &preprocessed.dataset,
            Some(preprocessed.summary),
            &model_dir,
        )
        .context("training failed")?;

    let report = &trained.report;
    println!("Test accuracy: {:.4}", report.test_accuracy);
    println!(
        "Cross-validation accuracy: {}",
        report.cross_validation.summary()
    );
    println!("{}", report.classification_report);
    println!("Artifacts written to {}", model_dir.display());
    Ok(())
}

fn predict(model_dir: PathBuf, input: Option<PathBuf>, interactive: bool) -> Result<()> {
    let predictor = Predictor::try_load(&model_dir)
        .with_context(|| format!("failed to load model from {}", model_dir.display()))?;

    if interactive {
        interactive_session(&InquireDriver, &predictor, print_result)?;
        return Ok(());
    }
    let Some(path) = input else {
        bail!("either --input <json> or --interactive is required");
    };
    let text =
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("{} is not JSON", path.display()))?;
    let result = predictor.predict_json(&value)?;
    print_result(&result)
}

fn print_result(result: &PredictionResult) -> Result<()> {
    let mut out = serde_json::to_value(result)?;
    if let Value::Object(map) = &mut out {
        map.insert("timestamp".into(), json!(Utc::now().to_rfc3339()));
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
