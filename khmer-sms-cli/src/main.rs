//! Command-line demo for the Khmer SMS classifier
//!
//! # Usage
//!
//! ```bash
//! # Classify the built-in sample messages
//! khmer-sms classify
//!
//! # Classify given messages with a named model
//! khmer-sms --model kh-sms-classifier classify "លោកអ្នកឈ្នះរង្វាន់ ១០០$"
//!
//! # Show what the model sees
//! khmer-sms normalize "  ១០០$  🎉 "
//!
//! # List models in the model directory
//! khmer-sms --model-dir ./models models
//! ```

use clap::{Parser, Subcommand};
use khmer_sms::model::KeywordModel;
use khmer_sms::{
    normalize_khmer_text, ClassificationResult, Classifier, ConfidenceMap, Config, ModelLoader,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SAMPLE_MESSAGES: &[&str] = &[
    "ពេលនេះ\u{200B} លោកអ្នកទទួលបានប្រាក់ ១០០$ សូមចុចតំណរភ្ជាប់ដើម្បីទទួលយកប្រាក់ https://example.com/claim",
    "សួស្តី! សូមជួបគ្នានៅភោជនីយដ្ឋាន ម៉ោង ៧ យប់នេះ។",
    "ប្រញាប់ឡើង! លោកអ្នកឈ្នះរង្វាន់ ១០០០$ ចូលមើលនៅ https://example.com/win",
    "សូមជូនពរខួបកំណើត។ សង្ឃឹមថាថ្ងៃនេះជាថ្ងៃដ៏សប្បាយសម្រាប់អ្នក។",
];

#[derive(Parser)]
#[command(name = "khmer-sms")]
#[command(about = "Classify Khmer SMS messages as ham or spam", version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model name (overrides config and KHMER_SMS_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Directory holding model manifests
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Use the built-in keyword model instead of resolving a manifest
    #[arg(long)]
    keyword: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify messages (sample messages when none are given)
    Classify {
        /// Messages to classify
        messages: Vec<String>,
    },
    /// Print the normalized form of messages
    Normalize {
        /// Messages to normalize
        messages: Vec<String>,
    },
    /// List available models
    Models,
}

/// One classified message
#[derive(Serialize)]
struct ClassificationReport<'a> {
    message: &'a str,
    normalized: String,
    result: ClassificationResult,
    confidences: ConfidenceMap,
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("khmer_sms={}", config.logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    match config.logging.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        "compact" => registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn build_classifier(cli: &Cli, config: &Config) -> Classifier {
    if cli.keyword {
        info!("Using built-in keyword model");
        return Classifier::with_model(Box::new(KeywordModel::new(
            config.classifier.model_name(),
        )));
    }

    Classifier::from_config(config)
}

fn classify(classifier: &Classifier, messages: &[String], json: bool) -> anyhow::Result<()> {
    let messages: Vec<&str> = if messages.is_empty() {
        SAMPLE_MESSAGES.to_vec()
    } else {
        messages.iter().map(String::as_str).collect()
    };

    if json {
        let reports: Vec<ClassificationReport> = messages
            .iter()
            .map(|&message| ClassificationReport {
                message,
                normalized: normalize_khmer_text(message),
                result: classifier.detailed_classification(message),
                confidences: classifier.classify_with_confidence(message),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for (index, message) in messages.iter().enumerate() {
        println!("Message {}: {}", index + 1, message);

        let result = classifier.detailed_classification(message);
        println!("Classification: {}", result.category);
        println!("Confidence: {:.2}%\n", result.confidence * 100.0);

        println!("All confidence scores:");
        for (category, confidence) in classifier.classify_with_confidence(message).iter() {
            println!("{}: {:.2}%", category, confidence * 100.0);
        }
        println!("\n{}\n", "-".repeat(50));
    }

    Ok(())
}

fn normalize(messages: &[String], json: bool) -> anyhow::Result<()> {
    let normalized: Vec<String> = messages.iter().map(|m| normalize_khmer_text(m)).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&normalized)?);
    } else {
        for line in normalized {
            println!("{}", line);
        }
    }

    Ok(())
}

fn list_models(config: &Config, json: bool) -> anyhow::Result<()> {
    let loader = ModelLoader::new(config.classifier.model_dir.clone());
    let models = loader.available_models();

    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
    } else if models.is_empty() {
        println!("No models found in {}", loader.model_dir().display());
    } else {
        for name in models {
            let marker = if name == config.classifier.model_name() { " (selected)" } else { "" };
            println!("{}{}", name, marker);
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(
        cli.model.clone(),
        cli.model_dir
            .as_ref()
            .map(|dir| dir.to_string_lossy().to_string()),
    );

    init_logging(&config);

    info!("Starting khmer-sms v{}", env!("CARGO_PKG_VERSION"));
    info!("  Model: {}", config.classifier.model_name());
    info!("  Model directory: {}", config.classifier.model_dir.display());

    match &cli.command {
        Commands::Classify { messages } => {
            let classifier = build_classifier(&cli, &config);
            classify(&classifier, messages, cli.json)
        }
        Commands::Normalize { messages } => normalize(messages, cli.json),
        Commands::Models => list_models(&config, cli.json),
    }
}
