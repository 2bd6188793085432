//! Shared data types for the classification pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Legitimate message (encoded as 0)
    Ham,
    /// Unsolicited message (encoded as 1)
    Spam,
}

impl Label {
    /// Parse a raw dataset label; only `ham` and `spam` (any case) are accepted
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "ham" => Some(Label::Ham),
            "spam" => Some(Label::Spam),
            _ => None,
        }
    }

    /// Numeric encoding used for training: ham = 0, spam = 1
    pub fn as_index(self) -> u8 {
        match self {
            Label::Ham => 0,
            Label::Spam => 1,
        }
    }

    pub fn is_spam(self) -> bool {
        self == Label::Spam
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Ham => "ham",
            Label::Spam => "spam",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One training example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledMessage {
    pub text: String,
    pub label: Label,
}

impl LabeledMessage {
    pub fn new(text: impl Into<String>, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Ordered training corpus, assembled once per training run
pub type Dataset = Vec<LabeledMessage>;

/// Verdict returned by the inference service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Decided class
    pub label: Label,
    /// Spam probability rounded to 4 decimals
    pub confidence: f64,
    /// Threshold the decision was made with
    pub threshold_used: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parse() {
        assert_eq!(Label::parse("ham"), Some(Label::Ham));
        assert_eq!(Label::parse("SPAM"), Some(Label::Spam));
        assert_eq!(Label::parse("Spam"), Some(Label::Spam));
        assert_eq!(Label::parse(" spam"), None);
        assert_eq!(Label::parse("junk"), None);
        assert_eq!(Label::parse(""), None);
    }

    #[test]
    fn test_label_encoding() {
        assert_eq!(Label::Ham.as_index(), 0);
        assert_eq!(Label::Spam.as_index(), 1);
        assert_eq!(Label::Spam.to_string(), "spam");
        assert_eq!(serde_json::to_string(&Label::Ham).unwrap(), "\"ham\"");
    }
}
