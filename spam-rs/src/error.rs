use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing persisted model artifacts
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode artifact {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("Failed to encode artifact: {0}")]
    Encode(#[source] bincode::Error),

    #[error("Unsupported artifact format version {found} in {} (expected {expected})", path.display())]
    Version {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("Invalid artifact {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: VectorizerError,
    },

    #[error("Vectorizer is unusable: {0}")]
    InvalidVectorizer(#[source] VectorizerError),

    #[error("Artifacts do not match: vectorizer has {vectorizer} features, classifier expects {classifier}")]
    DimensionMismatch { vectorizer: usize, classifier: usize },
}

/// Errors raised by the vectorizer
#[derive(Error, Debug, PartialEq)]
pub enum VectorizerError {
    #[error("Cannot fit vectorizer on an empty corpus")]
    EmptyCorpus,

    #[error("Vocabulary is empty after document frequency filtering (min_df={min_df}, max_df={max_df})")]
    EmptyVocabulary { min_df: f64, max_df: f64 },

    #[error("Invalid vectorizer parameters: {0}")]
    InvalidParams(String),

    #[error("Inconsistent vocabulary: {0}")]
    InconsistentVocabulary(String),
}

/// Errors raised while fitting the classifier
#[derive(Error, Debug, PartialEq)]
pub enum ClassifierError {
    #[error("Cannot fit classifier on an empty training set")]
    EmptyTrainingSet,

    #[error("Got {samples} samples but {labels} labels")]
    LengthMismatch { samples: usize, labels: usize },

    #[error("Training set contains a single class; both ham and spam are required")]
    SingleClass,

    #[error("Sample {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        found: usize,
        expected: usize,
    },

    #[error("Invalid classifier parameters: {0}")]
    InvalidParams(String),

    #[error("Optimizer failed: {0}")]
    Optimizer(String),
}

/// Errors raised by the offline training job
#[derive(Error, Debug)]
pub enum TrainError {
    #[error("Failed to read dataset {}: {source}", path.display())]
    DatasetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dataset {}: {source}", path.display())]
    DatasetCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("No usable rows after merging datasets")]
    EmptyDataset,

    #[error("Training split is empty (dataset has {0} rows)")]
    EmptySplit(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Vectorizer(#[from] VectorizerError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("Failed to write report: {0}")]
    Report(String),
}

/// Errors returned by the inference path
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// Caller error: the threshold is not a finite number in [0, 1]
    #[error("threshold must be between 0 and 1, got {0}")]
    InvalidThreshold(f64),

    /// Anything that went wrong while vectorizing or scoring
    #[error("internal inference error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, TrainError>;
