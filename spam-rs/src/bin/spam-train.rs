//! Offline trainer for the spam classifier
//!
//! Merges the labeled CSV datasets, fits the vectorizer and the classifier,
//! prints the evaluation report and writes the artifacts the API loads.
//!
//! # Usage
//!
//! ```bash
//! # Train on two sources with the default settings
//! spam-train --dataset data/spam.csv --dataset data/sms.csv --output-dir model
//!
//! # Override settings from a TOML file and switch to stemming
//! spam-train -d data/spam.csv --config train.toml --normalizer stem
//! ```

use clap::Parser;
use spam_rs::{NormalizerKind, Trainer, TrainingConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spam-train")]
#[command(about = "Train the spam/ham classifier", long_about = None)]
struct Cli {
    /// Labeled CSV dataset (label, message); repeat to merge several sources
    #[arg(short, long = "dataset", required = true)]
    datasets: Vec<PathBuf>,

    /// Directory the artifacts and report are written to
    #[arg(short, long, default_value = "model")]
    output_dir: PathBuf,

    /// Training configuration file (TOML)
    #[arg(short, long, env = "SPAM_TRAIN_CONFIG")]
    config: Option<PathBuf>,

    /// Token normalizer: lemma or stem
    #[arg(long)]
    normalizer: Option<NormalizerKind>,

    /// Seed for shuffling and the train/test split
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spam_rs=info,spam_train=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading training configuration from {}", path.display());
            TrainingConfig::from_file(path)?
        }
        None => TrainingConfig::default(),
    };
    if let Some(normalizer) = cli.normalizer {
        config.normalizer = normalizer;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    info!("Starting spam-train v{}", env!("CARGO_PKG_VERSION"));

    let trainer = Trainer::new(config);
    let outcome = trainer.run(&cli.datasets, &cli.output_dir)?;

    println!("{}", outcome.report.evaluation);
    println!();
    println!("Vectorizer saved to {}", outcome.vectorizer_path.display());
    println!("Classifier saved to {}", outcome.classifier_path.display());
    if !outcome.report.fit.converged {
        println!(
            "Warning: optimizer stopped after {} iterations without converging",
            outcome.report.fit.iterations
        );
    }

    Ok(())
}
