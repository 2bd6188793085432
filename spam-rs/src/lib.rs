//! spam-rs: Spam/ham message classification
//!
//! A TF-IDF + logistic regression pipeline for short text messages, split
//! into an offline training job and a read-only inference service.
//!
//! # Pipeline
//!
//! - **Preprocessing**: lowercase, tokenize, drop stopwords and non-words,
//!   POS-aware lemmatization (or Snowball stemming)
//! - **Datasets**: merge labeled CSV sources into one shuffled corpus
//! - **Features**: unigram + bigram TF-IDF with document-frequency filtering
//! - **Model**: L2-regularized logistic regression fitted with L-BFGS
//! - **Serving**: thresholded predictions from frozen artifacts
//!
//! # Example
//!
//! ```no_run
//! use spam_rs::inference::{InferenceOptions, InferenceService};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = InferenceService::load(
//!         Path::new("model/vectorizer.bin"),
//!         Path::new("model/spam_classifier.bin"),
//!         InferenceOptions::default(),
//!     )?;
//!
//!     let result = service.predict("WIN FREE CASH NOW", 0.5)?;
//!     println!("{} ({})", result.label, result.confidence);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`preprocess`]: Text normalization
//! - [`dataset`]: Training corpus assembly
//! - [`vectorizer`]: TF-IDF feature extraction
//! - [`classifier`]: Logistic regression
//! - [`metrics`]: Evaluation report
//! - [`artifacts`]: Model persistence
//! - [`trainer`]: Offline training job
//! - [`inference`]: Serving-side predictor

pub mod artifacts;
pub mod classifier;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod metrics;
pub mod preprocess;
pub mod trainer;
pub mod types;
pub mod vectorizer;

// Re-export commonly used types
pub use error::{ArtifactError, PredictError, Result, TrainError};
pub use inference::{InferenceOptions, InferenceService};
pub use preprocess::{NormalizerKind, TextPreprocessor};
pub use trainer::{Trainer, TrainingConfig};
pub use types::{Label, LabeledMessage, PredictionResult};
