//! Serving-side predictor
//!
//! Loads the two artifacts once and answers `predict` calls from any number
//! of threads. The service holds no mutable state.

use std::path::Path;
use tracing::{debug, info};

use crate::artifacts;
use crate::classifier::LogisticRegression;
use crate::error::{ArtifactError, PredictError};
use crate::preprocess::{NormalizerKind, TextPreprocessor};
use crate::types::{Label, PredictionResult};
use crate::vectorizer::TfidfVectorizer;

#[derive(Debug, Clone, Copy)]
pub struct InferenceOptions {
    /// Run request text through the same preprocessing as training
    pub preprocess_requests: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            preprocess_requests: true,
        }
    }
}

pub struct InferenceService {
    preprocessor: TextPreprocessor,
    vectorizer: TfidfVectorizer,
    classifier: LogisticRegression,
    options: InferenceOptions,
}

impl InferenceService {
    /// Load both artifacts. Fails when either is missing, unreadable, or
    /// when they were not produced by the same training run.
    pub fn load(
        vectorizer_path: &Path,
        classifier_path: &Path,
        options: InferenceOptions,
    ) -> Result<Self, ArtifactError> {
        let vectorizer = artifacts::load_vectorizer(vectorizer_path)?;
        let classifier = artifacts::load_classifier(classifier_path)?;
        Self::from_parts(vectorizer.vectorizer, vectorizer.normalizer, classifier, options)
    }

    pub fn from_parts(
        vectorizer: TfidfVectorizer,
        normalizer: NormalizerKind,
        classifier: LogisticRegression,
        options: InferenceOptions,
    ) -> Result<Self, ArtifactError> {
        vectorizer
            .vocabulary()
            .validate()
            .map_err(ArtifactError::InvalidVectorizer)?;
        if vectorizer.num_features() != classifier.num_features() {
            return Err(ArtifactError::DimensionMismatch {
                vectorizer: vectorizer.num_features(),
                classifier: classifier.num_features(),
            });
        }

        info!(
            vocabulary_size = vectorizer.num_features(),
            %normalizer,
            preprocess_requests = options.preprocess_requests,
            "Inference service ready"
        );

        Ok(Self {
            preprocessor: TextPreprocessor::new(normalizer),
            vectorizer,
            classifier,
            options,
        })
    }

    /// Unrounded P(spam | message)
    pub fn spam_probability(&self, message: &str) -> Result<f64, PredictError> {
        let vector = if self.options.preprocess_requests {
            self.vectorizer.transform(&self.preprocessor.process(message))
        } else {
            self.vectorizer.transform(message)
        };

        let probability = self.classifier.predict_proba(&vector);
        if !probability.is_finite() {
            return Err(PredictError::Internal(format!(
                "model produced a non-finite probability ({probability})"
            )));
        }
        Ok(probability)
    }

    /// Classify `message`; spam when the probability reaches `threshold`.
    pub fn predict(&self, message: &str, threshold: f64) -> Result<PredictionResult, PredictError> {
        validate_threshold(threshold)?;

        let probability = self.spam_probability(message)?;
        let label = if probability >= threshold {
            Label::Spam
        } else {
            Label::Ham
        };
        debug!(%label, probability, threshold, "Message classified");

        Ok(PredictionResult {
            label,
            confidence: round4(probability),
            threshold_used: threshold,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.num_features()
    }

    pub fn normalizer(&self) -> NormalizerKind {
        self.preprocessor.kind()
    }

    pub fn options(&self) -> InferenceOptions {
        self.options
    }
}

/// Thresholds must be finite and within [0, 1]
pub fn validate_threshold(threshold: f64) -> Result<(), PredictError> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(PredictError::InvalidThreshold(threshold))
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
