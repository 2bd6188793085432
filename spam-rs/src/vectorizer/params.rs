use serde::{Deserialize, Serialize};

use crate::error::VectorizerError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerParams {
    /// Smallest n-gram size (inclusive)
    pub ngram_min: usize,
    /// Largest n-gram size (inclusive)
    pub ngram_max: usize,
    /// Minimum document frequency for filtering vocabulary.
    /// - If `min_df` is in (0.0, 1.0), it's a proportion of documents
    /// - If `min_df` >= 1.0, it's an absolute document count
    pub min_df: f64,
    /// Maximum document frequency for filtering vocabulary.
    /// - If `max_df` is in (0.0, 1.0], it's a proportion of documents
    /// - If `max_df` > 1.0, it's an absolute document count
    pub max_df: f64,
}

impl VectorizerParams {
    pub fn validate(&self) -> Result<(), VectorizerError> {
        if self.ngram_min == 0 || self.ngram_min > self.ngram_max {
            return Err(VectorizerError::InvalidParams(format!(
                "ngram range {}..={} is empty",
                self.ngram_min, self.ngram_max
            )));
        }
        if !(self.min_df > 0.0) {
            return Err(VectorizerError::InvalidParams(
                "min_df must be positive (proportion in (0.0, 1.0) or absolute count >= 1.0)".into(),
            ));
        }
        if !(self.max_df > 0.0) {
            return Err(VectorizerError::InvalidParams(
                "max_df must be positive (proportion in (0.0, 1.0] or absolute count > 1.0)".into(),
            ));
        }
        Ok(())
    }

    /// Smallest document count a term must reach to be kept
    pub fn min_doc_count(&self, n_docs: usize) -> usize {
        if self.min_df >= 1.0 {
            self.min_df as usize
        } else {
            (self.min_df * n_docs as f64).ceil() as usize
        }
    }

    /// Largest document count a term may reach to be kept
    pub fn max_doc_count(&self, n_docs: usize) -> usize {
        if self.max_df > 1.0 {
            self.max_df as usize
        } else {
            (self.max_df * n_docs as f64).floor() as usize
        }
    }
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            ngram_min: 1,
            ngram_max: 2,
            min_df: 5.0,
            max_df: 0.95,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_count_bounds() {
        let params = VectorizerParams::default();
        assert_eq!(params.min_doc_count(1000), 5);
        assert_eq!(params.max_doc_count(1000), 950);
        assert_eq!(params.max_doc_count(10), 9);

        let proportional = VectorizerParams {
            min_df: 0.01,
            max_df: 40.0,
            ..Default::default()
        };
        assert_eq!(proportional.min_doc_count(250), 3);
        assert_eq!(proportional.max_doc_count(250), 40);
    }

    #[test]
    fn test_validate() {
        assert!(VectorizerParams::default().validate().is_ok());
        let bad = VectorizerParams {
            ngram_min: 3,
            ngram_max: 2,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = VectorizerParams {
            min_df: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
