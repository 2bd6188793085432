//! Offline training job
//!
//! merge datasets -> preprocess every message -> seeded train/test split ->
//! fit the vectorizer on the training split only -> fit the classifier ->
//! evaluate on the test split -> persist both artifacts and a JSON report.
//!
//! Evaluation never gates persistence: the artifacts are written whatever
//! the metrics look like.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::artifacts::{self, artifact_paths};
use crate::classifier::{ClassifierParams, FitReport, LogisticRegression};
use crate::dataset::{DatasetMerger, MergeSummary, DEFAULT_SEED};
use crate::error::{Result, TrainError};
use crate::metrics::{self, EvaluationReport};
use crate::preprocess::{NormalizerKind, TextPreprocessor};
use crate::types::{Dataset, Label};
use crate::vectorizer::{TfidfVectorizer, VectorizerParams};

pub const REPORT_FILE: &str = "metrics.json";

/// Training configuration, loadable from TOML
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub vectorizer: VectorizerParams,
    pub classifier: ClassifierParams,
    /// Fraction of the merged dataset held out for evaluation
    pub test_size: f64,
    /// Seed for both the merge shuffle and the split
    pub seed: u64,
    pub normalizer: NormalizerKind,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            vectorizer: VectorizerParams::default(),
            classifier: ClassifierParams::default(),
            test_size: 0.2,
            seed: DEFAULT_SEED,
            normalizer: NormalizerKind::default(),
        }
    }
}

impl TrainingConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TrainError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| TrainError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(TrainError::Config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        self.vectorizer.validate()?;
        self.classifier.validate()?;
        Ok(())
    }
}

/// Persisted summary of one training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub trained_at: DateTime<Utc>,
    pub normalizer: NormalizerKind,
    pub seed: u64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub vocabulary_size: usize,
    pub merge: MergeSummary,
    pub fit: FitReport,
    pub evaluation: EvaluationReport,
}

/// Everything a training run produced, still in memory
pub struct TrainingOutcome {
    pub preprocessor: TextPreprocessor,
    pub vectorizer: TfidfVectorizer,
    pub classifier: LogisticRegression,
    pub report: TrainingReport,
    pub vectorizer_path: PathBuf,
    pub classifier_path: PathBuf,
}

impl TrainingOutcome {
    /// Spam probability of a raw message using the in-memory pipeline
    pub fn spam_probability(&self, message: &str) -> f64 {
        let cleaned = self.preprocessor.process(message);
        self.classifier
            .predict_proba(&self.vectorizer.transform(&cleaned))
    }
}

pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Merge the CSV sources and train on the result
    pub fn run(&self, datasets: &[PathBuf], output_dir: &Path) -> Result<TrainingOutcome> {
        self.config.validate()?;

        let merger = DatasetMerger::new(datasets.to_vec()).with_seed(self.config.seed);
        let (dataset, summary) = merger.merge()?;
        self.train(dataset, summary, output_dir)
    }

    /// Train on an already merged dataset
    pub fn train(
        &self,
        dataset: Dataset,
        merge: MergeSummary,
        output_dir: &Path,
    ) -> Result<TrainingOutcome> {
        let config = &self.config;
        config.validate()?;

        if dataset.is_empty() {
            return Err(TrainError::EmptyDataset);
        }
        info!(
            ham = merge.ham,
            spam = merge.spam,
            normalizer = %config.normalizer,
            "Class distribution"
        );

        let preprocessor = TextPreprocessor::new(config.normalizer);
        let texts: Vec<String> = dataset.iter().map(|m| preprocessor.process(&m.text)).collect();
        let labels: Vec<Label> = dataset.iter().map(|m| m.label).collect();
        debug!(rows = texts.len(), "Messages preprocessed");

        let (train_idx, test_idx) = split_indices(texts.len(), config.test_size, config.seed);
        if train_idx.is_empty() || test_idx.is_empty() {
            return Err(TrainError::EmptySplit(texts.len()));
        }
        info!(train = train_idx.len(), test = test_idx.len(), "Dataset split");

        let train_texts: Vec<&str> = train_idx.iter().map(|&i| texts[i].as_str()).collect();
        let train_labels: Vec<Label> = train_idx.iter().map(|&i| labels[i]).collect();
        let test_texts: Vec<&str> = test_idx.iter().map(|&i| texts[i].as_str()).collect();
        let test_labels: Vec<Label> = test_idx.iter().map(|&i| labels[i]).collect();

        let vectorizer = TfidfVectorizer::fit(&train_texts, config.vectorizer.clone())?;
        info!(vocabulary_size = vectorizer.num_features(), "Vectorizer fitted");

        let train_vectors = vectorizer.transform_all(&train_texts);
        let (classifier, fit) = LogisticRegression::fit(&train_vectors, &train_labels, &config.classifier)?;

        let test_vectors = vectorizer.transform_all(&test_texts);
        let probabilities = classifier.predict_proba_all(&test_vectors);
        let evaluation = metrics::evaluate(&probabilities, &test_labels);
        info!("Classification report:\n{}", evaluation);

        std::fs::create_dir_all(output_dir).map_err(|e| {
            TrainError::Report(format!("Failed to create {}: {}", output_dir.display(), e))
        })?;
        let (vectorizer_path, classifier_path) = artifact_paths(output_dir);
        artifacts::save_vectorizer(&vectorizer_path, &vectorizer, config.normalizer)?;
        artifacts::save_classifier(&classifier_path, &classifier)?;

        let report = TrainingReport {
            trained_at: Utc::now(),
            normalizer: config.normalizer,
            seed: config.seed,
            train_rows: train_idx.len(),
            test_rows: test_idx.len(),
            vocabulary_size: vectorizer.num_features(),
            merge,
            fit,
            evaluation,
        };
        write_report(&output_dir.join(REPORT_FILE), &report)?;

        info!(
            output_dir = %output_dir.display(),
            accuracy = report.evaluation.accuracy,
            roc_auc = ?report.evaluation.roc_auc,
            "Training complete"
        );

        Ok(TrainingOutcome {
            preprocessor,
            vectorizer,
            classifier,
            report,
            vectorizer_path,
            classifier_path,
        })
    }
}

/// Shuffle row indices with `seed`; the first ceil(test_size * n) form the
/// test split and the rest the training split. No stratification.
pub fn split_indices(n: usize, test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((test_size * n as f64).ceil() as usize).min(n);
    let train = indices.split_off(n_test);
    (train, indices)
}

fn write_report(path: &Path, report: &TrainingReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(|e| TrainError::Report(e.to_string()))?;
    std::fs::write(path, json)
        .map_err(|e| TrainError::Report(format!("Failed to write {}: {}", path.display(), e)))?;
    debug!(path = %path.display(), "Training report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LabeledMessage;
    use tempfile::TempDir;

    fn small_dataset() -> Dataset {
        let mut data = Vec::new();
        for i in 0..15 {
            data.push(LabeledMessage::new(format!("win free cash prize now {i}"), Label::Spam));
            data.push(LabeledMessage::new(format!("see you at lunch tomorrow {i}"), Label::Ham));
        }
        data
    }

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            vectorizer: VectorizerParams {
                min_df: 1.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_split_indices() {
        let (train, test) = split_indices(10, 0.2, 42);
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        let mut all: Vec<usize> = train.iter().chain(&test).copied().collect();
        all.sort();
        assert_eq!(all, (0..10).collect::<Vec<_>>());

        assert_eq!(split_indices(10, 0.2, 42), (train, test));
        assert_eq!(split_indices(11, 0.2, 7).1.len(), 3);
    }

    #[test]
    fn test_config_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("train.toml");
        std::fs::write(
            &path,
            "test_size = 0.25\nseed = 7\nnormalizer = \"stem\"\n\n[vectorizer]\nmin_df = 2.0\n\n[classifier]\nmax_iter = 50\n",
        )
        .unwrap();

        let config = TrainingConfig::from_file(&path).unwrap();
        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.seed, 7);
        assert_eq!(config.normalizer, NormalizerKind::Stem);
        assert_eq!(config.vectorizer.min_df, 2.0);
        assert_eq!(config.vectorizer.max_df, 0.95);
        assert_eq!(config.classifier.max_iter, 50);
        assert_eq!(config.classifier.c, 1.0);
    }

    #[test]
    fn test_config_validation() {
        let config = TrainingConfig {
            test_size: 1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TrainError::Config(_))));
    }

    #[test]
    fn test_train_persists_artifacts_and_report() {
        let dir = TempDir::new().unwrap();
        let trainer = Trainer::new(small_config());

        let outcome = trainer
            .train(small_dataset(), MergeSummary::default(), dir.path())
            .unwrap();

        assert!(outcome.vectorizer_path.exists());
        assert!(outcome.classifier_path.exists());
        assert_eq!(outcome.report.train_rows, 24);
        assert_eq!(outcome.report.test_rows, 6);

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(REPORT_FILE)).unwrap()).unwrap();
        assert_eq!(report["normalizer"], "lemma");
        assert!(report["evaluation"]["accuracy"].as_f64().is_some());

        assert!(outcome.spam_probability("win free cash") > 0.5);
        assert!(outcome.spam_probability("lunch tomorrow") < 0.5);
    }

    #[test]
    fn test_uninformative_data_still_persists() {
        // Every message is the same text, so the model cannot tell the classes apart
        let data: Dataset = (0..30)
            .map(|i| {
                let label = if i % 2 == 0 { Label::Spam } else { Label::Ham };
                LabeledMessage::new("hello hello", label)
            })
            .collect();
        let config = TrainingConfig {
            vectorizer: VectorizerParams {
                min_df: 1.0,
                max_df: 1.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let dir = TempDir::new().unwrap();
        let outcome = Trainer::new(config)
            .train(data, MergeSummary::default(), dir.path())
            .unwrap();

        let evaluation = &outcome.report.evaluation;
        let confusion = &evaluation.confusion;
        assert!(confusion.tp + confusion.fp == 0 || confusion.tn + confusion.fn_count == 0);
        assert!(evaluation.roc_auc.map_or(true, |auc| (auc - 0.5).abs() < 1e-12));

        assert!(dir.path().join(artifacts::VECTORIZER_FILE).exists());
        assert!(dir.path().join(artifacts::CLASSIFIER_FILE).exists());
        assert!(dir.path().join(REPORT_FILE).exists());
    }

    #[test]
    fn test_empty_dataset() {
        let dir = TempDir::new().unwrap();
        let trainer = Trainer::new(small_config());
        let err = trainer
            .train(Vec::new(), MergeSummary::default(), dir.path())
            .err()
            .unwrap();
        assert!(matches!(err, TrainError::EmptyDataset));
    }
}
