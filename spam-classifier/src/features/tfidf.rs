//! TF-IDF vectorizer
//!
//! Term counts weighted by smoothed inverse document frequency
//! (`ln((1 + n) / (1 + df)) + 1`) and L2-normalized per document.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;
use tracing::debug;

use super::sparse::SparseVector;
use super::stop_words::is_stop_word;
use crate::error::{Result, SpamError};

/// Tokens are runs of two or more word characters
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"))
}

/// Vectorizer hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfParams {
    pub lowercase: bool,
    /// Drop English stop words
    pub stop_words: bool,
    /// Minimum number of training documents a term must appear in
    pub min_df: usize,
}

impl Default for TfidfParams {
    fn default() -> Self {
        Self {
            lowercase: true,
            stop_words: true,
            min_df: 1,
        }
    }
}

impl TfidfParams {
    /// Split a document into the tokens the vocabulary is built from
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        token_pattern()
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|t| !(self.stop_words && is_stop_word(t)))
            .map(str::to_string)
            .collect()
    }
}

/// A fitted TF-IDF vectorizer. Only obtainable through [`TfidfVectorizer::fit`]
/// or deserialization, so a value of this type always has a vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    params: TfidfParams,
    /// Term -> column index, columns assigned in term order
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and IDF weights from the training documents
    pub fn fit<S: AsRef<str>>(params: TfidfParams, documents: &[S]) -> Result<Self> {
        if params.min_df == 0 {
            return Err(SpamError::InvalidParameter("min_df must be at least 1".to_string()));
        }

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let unique: HashSet<String> = params.tokenize(doc.as_ref()).into_iter().collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let kept: BTreeMap<String, usize> = document_frequency
            .into_iter()
            .filter(|&(_, df)| df >= params.min_df)
            .collect();

        if kept.is_empty() {
            return Err(SpamError::EmptyVocabulary);
        }

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(kept.len());
        for (column, (term, df)) in kept.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, column);
        }

        debug!(
            "Fitted TF-IDF vocabulary: {} terms from {} documents",
            vocabulary.len(),
            documents.len()
        );

        Ok(Self {
            params,
            vocabulary,
            idf,
        })
    }

    /// Fit on `documents` and return their feature vectors
    pub fn fit_transform<S: AsRef<str>>(
        params: TfidfParams,
        documents: &[S],
    ) -> Result<(Self, Vec<SparseVector>)> {
        let vectorizer = Self::fit(params, documents)?;
        let features = vectorizer.transform_batch(documents);
        Ok((vectorizer, features))
    }

    /// Map a document into the fitted feature space. Unknown terms are ignored.
    pub fn transform(&self, document: &str) -> SparseVector {
        let pairs: Vec<(usize, f64)> = self
            .params
            .tokenize(document)
            .iter()
            .filter_map(|t| self.vocabulary.get(t.as_str()).copied())
            .map(|column| (column, 1.0))
            .collect();

        // counts first, then weight, so duplicate terms accumulate before idf
        let counts = SparseVector::from_pairs(self.dim(), pairs);
        let weighted = counts.iter().map(|(i, tf)| (i, tf * self.idf[i])).collect();

        let mut vector = SparseVector::from_pairs(self.dim(), weighted);
        vector.normalize();
        vector
    }

    pub fn transform_batch<S: AsRef<str>>(&self, documents: &[S]) -> Vec<SparseVector> {
        documents.iter().map(|d| self.transform(d.as_ref())).collect()
    }

    /// Number of feature columns
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    pub fn params(&self) -> &TfidfParams {
        &self.params
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&i| self.idf[i])
    }

    /// Structural check used after deserialization
    pub(crate) fn check_consistency(&self) -> std::result::Result<(), String> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(format!(
                "vocabulary has {} terms but {} idf weights",
                self.vocabulary.len(),
                self.idf.len()
            ));
        }
        if self.vocabulary.values().any(|&i| i >= self.idf.len()) {
            return Err("vocabulary index out of range".to_string());
        }
        Ok(())
    }
}
