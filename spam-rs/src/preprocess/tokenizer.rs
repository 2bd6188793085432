//! Word tokenizer for message text
//!
//! Splits text into words and punctuation the way a Treebank tokenizer does:
//! punctuation becomes its own token and English contractions are split into
//! the host word and the clitic (`don't` -> `do`, `n't`; `it's` -> `it`, `'s`).

use regex::Regex;

/// Words (with optional inner apostrophes) or single punctuation characters
const WORD_PATTERN: &str = r"\w+(?:'\w+)*|[^\w\s]";

pub struct WordTokenizer {
    pattern: Regex,
}

impl WordTokenizer {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(WORD_PATTERN).expect("word pattern is a valid regex"),
        }
    }

    /// Tokenize `text` without changing its case
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for m in self.pattern.find_iter(text) {
            split_contraction(m.as_str(), &mut tokens);
        }

        tokens
    }
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

fn split_contraction(word: &str, out: &mut Vec<String>) {
    let lower = word.to_lowercase();

    if lower.len() > 3 && lower.ends_with("n't") {
        let split = word.len() - 3;
        out.push(word[..split].to_string());
        out.push(word[split..].to_string());
        return;
    }

    match word.find('\'') {
        Some(idx) if idx > 0 => {
            out.push(word[..idx].to_string());
            out.push(word[idx..].to_string());
        }
        _ => out.push(word.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_is_split() {
        let tokenizer = WordTokenizer::new();
        assert_eq!(
            tokenizer.tokenize("hey, are we still meeting at 3pm tomorrow?"),
            vec!["hey", ",", "are", "we", "still", "meeting", "at", "3pm", "tomorrow", "?"]
        );
    }

    #[test]
    fn test_contractions() {
        let tokenizer = WordTokenizer::new();
        assert_eq!(tokenizer.tokenize("don't"), vec!["do", "n't"]);
        assert_eq!(tokenizer.tokenize("it's fine"), vec!["it", "'s", "fine"]);
        assert_eq!(tokenizer.tokenize("we'll"), vec!["we", "'ll"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        let tokenizer = WordTokenizer::new();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("   \t\n").is_empty());
    }

    #[test]
    fn test_unicode_words() {
        let tokenizer = WordTokenizer::new();
        assert_eq!(tokenizer.tokenize("café gratuit!"), vec!["café", "gratuit", "!"]);
    }
}
