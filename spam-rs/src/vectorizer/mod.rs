//! TF-IDF feature extraction
//!
//! `fit` learns a frozen vocabulary of unigrams and bigrams with smoothed IDF
//! weights; `transform` maps any text into that fixed space as an
//! L2-normalized sparse vector. Terms outside the vocabulary are ignored.

pub mod ngrams;
pub mod params;

use serde::{Deserialize, Serialize};
use sprs::CsVec;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::error::VectorizerError;
pub use ngrams::TermExtractor;
pub use params::VectorizerParams;

/// Sparse, L2-normalized TF-IDF vector indexed by the vocabulary
pub type FeatureVector = CsVec<f64>;

/// Frozen term -> (index, idf) mapping
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    /// Feature index and IDF weight of `term`
    pub fn get(&self, term: &str) -> Option<(usize, f64)> {
        self.index.get(term).map(|&idx| (idx, self.idf[idx]))
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Every term maps to a distinct index below `len()` and every IDF
    /// weight is finite. Fitted vocabularies always hold this; decoded ones
    /// may not.
    pub fn validate(&self) -> Result<(), VectorizerError> {
        if self.index.len() != self.idf.len() {
            return Err(VectorizerError::InconsistentVocabulary(format!(
                "{} terms but {} idf weights",
                self.index.len(),
                self.idf.len()
            )));
        }
        let mut seen = vec![false; self.idf.len()];
        for (term, &idx) in &self.index {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(VectorizerError::InconsistentVocabulary(format!(
                        "index {idx} is assigned to more than one term"
                    )))
                }
                None => {
                    return Err(VectorizerError::InconsistentVocabulary(format!(
                        "term {term:?} has index {idx}, vocabulary size is {}",
                        self.idf.len()
                    )))
                }
            }
        }
        if let Some(idx) = self.idf.iter().position(|w| !w.is_finite()) {
            return Err(VectorizerError::InconsistentVocabulary(format!(
                "idf weight at index {idx} is not finite"
            )));
        }
        Ok(())
    }

    /// Terms ordered by feature index
    pub fn terms(&self) -> Vec<&str> {
        let mut terms: Vec<(&str, usize)> =
            self.index.iter().map(|(t, &i)| (t.as_str(), i)).collect();
        terms.sort_by_key(|(_, i)| *i);
        terms.into_iter().map(|(t, _)| t).collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    params: VectorizerParams,
    vocabulary: Vocabulary,
    #[serde(skip)]
    extractor: TermExtractor,
}

impl TfidfVectorizer {
    /// Learn vocabulary and IDF weights from the training corpus
    pub fn fit<T: AsRef<str>>(texts: &[T], params: VectorizerParams) -> Result<Self, VectorizerError> {
        params.validate()?;
        if texts.is_empty() {
            return Err(VectorizerError::EmptyCorpus);
        }

        debug!(num_texts = texts.len(), "Fitting TfidfVectorizer");
        let extractor = TermExtractor::new();

        // Document frequency: each term counted once per document
        let mut df: HashMap<String, usize> = HashMap::new();
        for text in texts {
            for term in extractor
                .count_ngrams(text.as_ref(), params.ngram_min, params.ngram_max)
                .into_keys()
            {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let n_docs = texts.len();
        let min_count = params.min_doc_count(n_docs);
        let max_count = params.max_doc_count(n_docs);
        let candidates = df.len();

        let mut kept: Vec<(String, usize)> = df
            .into_iter()
            .filter(|(_, count)| *count >= min_count && *count <= max_count)
            .collect();
        debug!(
            original_size = candidates,
            filtered_size = kept.len(),
            min_count,
            max_count,
            "Vocabulary filtered by document frequency"
        );

        if kept.is_empty() {
            return Err(VectorizerError::EmptyVocabulary {
                min_df: params.min_df,
                max_df: params.max_df,
            });
        }

        kept.sort();

        // Smoothed IDF: ln((1 + n) / (1 + df)) + 1
        let n = n_docs as f64;
        let mut index = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (i, (term, count)) in kept.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + count as f64)).ln() + 1.0);
            index.insert(term, i);
        }

        debug!(vocab_size = idf.len(), "TfidfVectorizer fitting complete");

        Ok(Self {
            params,
            vocabulary: Vocabulary { index, idf },
            extractor,
        })
    }

    /// Map one text into the frozen feature space
    pub fn transform(&self, text: &str) -> FeatureVector {
        let counts = self
            .extractor
            .count_ngrams(text, self.params.ngram_min, self.params.ngram_max);

        let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
        for (term, count) in counts {
            if let Some((idx, idf)) = self.vocabulary.get(&term) {
                weights.insert(idx, count as f64 * idf);
            }
        }

        let norm = weights.values().map(|v| v * v).sum::<f64>().sqrt();
        let (indices, data): (Vec<usize>, Vec<f64>) = weights
            .into_iter()
            .map(|(idx, v)| (idx, if norm > 0.0 { v / norm } else { v }))
            .unzip();

        CsVec::new(self.num_features(), indices, data)
    }

    pub fn transform_all<T: AsRef<str>>(&self, texts: &[T]) -> Vec<FeatureVector> {
        debug!(num_texts = texts.len(), "Transforming texts using TfidfVectorizer");
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }

    pub fn num_features(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }
}
