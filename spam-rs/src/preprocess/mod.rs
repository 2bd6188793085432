//! Text preprocessing
//!
//! Turns a raw message into the canonical token stream the model is trained
//! on: lowercase, tokenize, drop non-alphabetic tokens and stopwords, tag each
//! survivor with a part of speech, reduce it to its base form and rejoin with
//! single spaces.

pub mod lemmatizer;
pub mod stopwords;
pub mod tagger;
pub mod tokenizer;

use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub use lemmatizer::{Lemmatizer, WordClass};
pub use tagger::PosTagger;
pub use tokenizer::WordTokenizer;

/// How surviving tokens are reduced to a base form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizerKind {
    /// POS-aware dictionary lemmatization
    #[default]
    Lemma,
    /// Snowball English stemming (ignores the POS tag)
    Stem,
}

impl fmt::Display for NormalizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizerKind::Lemma => f.write_str("lemma"),
            NormalizerKind::Stem => f.write_str("stem"),
        }
    }
}

impl FromStr for NormalizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lemma" => Ok(NormalizerKind::Lemma),
            "stem" => Ok(NormalizerKind::Stem),
            other => Err(format!("unknown normalizer '{other}' (expected 'lemma' or 'stem')")),
        }
    }
}

enum Normalizer {
    Lemma(Lemmatizer),
    Stem(Stemmer),
}

/// Message normalizer shared by training and serving
pub struct TextPreprocessor {
    tokenizer: WordTokenizer,
    stopwords: HashSet<&'static str>,
    tagger: PosTagger,
    normalizer: Normalizer,
    kind: NormalizerKind,
}

impl TextPreprocessor {
    pub fn new(kind: NormalizerKind) -> Self {
        let normalizer = match kind {
            NormalizerKind::Lemma => Normalizer::Lemma(Lemmatizer::new()),
            NormalizerKind::Stem => Normalizer::Stem(Stemmer::create(Algorithm::English)),
        };

        Self {
            tokenizer: WordTokenizer::new(),
            stopwords: stopwords::english(),
            tagger: PosTagger::new(),
            normalizer,
            kind,
        }
    }

    pub fn kind(&self) -> NormalizerKind {
        self.kind
    }

    /// Normalize one message
    pub fn process(&self, text: &str) -> String {
        let lowered = text.to_lowercase();

        let tokens: Vec<String> = self
            .tokenizer
            .tokenize(&lowered)
            .into_iter()
            .filter(|t| is_alphabetic(t) && !self.stopwords.contains(t.as_str()))
            .collect();

        let tags = self.tagger.tag(&tokens);

        let normalized: Vec<String> = tokens
            .iter()
            .zip(tags)
            .map(|(token, tag)| match &self.normalizer {
                Normalizer::Lemma(lemmatizer) => {
                    lemmatizer.lemmatize(token, WordClass::from_treebank(tag))
                }
                Normalizer::Stem(stemmer) => stemmer.stem(token).into_owned(),
            })
            .collect();

        normalized.join(" ")
    }

    /// Normalize a batch of messages, preserving order
    pub fn process_all<T: AsRef<str>>(&self, texts: &[T]) -> Vec<String> {
        texts.iter().map(|t| self.process(t.as_ref())).collect()
    }
}

impl Default for TextPreprocessor {
    fn default() -> Self {
        Self::new(NormalizerKind::default())
    }
}

fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}
