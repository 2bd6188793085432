use regex::Regex;
use std::collections::HashMap;

/// Two or more word characters, as scikit-style text vectorizers default to
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Splits text into lowercase terms and expands them to n-grams
#[derive(Clone, Debug)]
pub struct TermExtractor {
    pattern: Regex,
}

impl TermExtractor {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex"),
        }
    }

    pub fn tokens(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Count every n-gram of `text` for n in `min..=max`; n-grams are joined with one space
    pub fn count_ngrams(&self, text: &str, min: usize, max: usize) -> HashMap<String, usize> {
        let tokens = self.tokens(text);
        let mut counts = HashMap::new();

        for n in min..=max {
            for window in tokens.windows(n) {
                *counts.entry(window.join(" ")).or_insert(0) += 1;
            }
        }

        counts
    }
}

impl Default for TermExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_skip_single_characters() {
        let extractor = TermExtractor::new();
        assert_eq!(extractor.tokens("I got a FREE prize!"), vec!["got", "free", "prize"]);
    }

    #[test]
    fn test_unigrams_and_bigrams() {
        let extractor = TermExtractor::new();
        let counts = extractor.count_ngrams("win cash win cash", 1, 2);
        assert_eq!(counts["win"], 2);
        assert_eq!(counts["cash"], 2);
        assert_eq!(counts["win cash"], 2);
        assert_eq!(counts["cash win"], 1);
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn test_empty_text() {
        let extractor = TermExtractor::new();
        assert!(extractor.count_ngrams("", 1, 2).is_empty());
        assert!(extractor.count_ngrams("a b c", 1, 2).is_empty());
    }
}
