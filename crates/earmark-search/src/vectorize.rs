//! TF-IDF vectorizer.
//!
//! ```text
//! tf(t, d)  = count of t in d
//! idf(t)    = ln((1 + N) / (1 + df(t))) + 1
//! w(t, d)   = tf(t, d) * idf(t), then each row is L2-normalized
//! ```
//!
//! The vocabulary is fixed at fit time. There is no incremental update:
//! adding entries means fitting again over the whole corpus.

use std::collections::{BTreeMap, HashMap, HashSet};

use earmark_core::{Error, Result};

use crate::matrix::{normalized_vector, FeatureMatrix, SparseVector};
use crate::tokenize::Tokenizer;

/// Default vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Fitted vocabulary: term ↔ column, with one idf weight per column.
///
/// Columns are in alphabetical term order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl Vocabulary {
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[must_use]
    pub fn column(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    #[must_use]
    pub fn term(&self, col: usize) -> Option<&str> {
        self.terms.get(col).map(String::as_str)
    }

    #[must_use]
    pub fn idf(&self, col: usize) -> Option<f64> {
        self.idf.get(col).copied()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Weight a token list against this vocabulary and L2-normalize it.
    /// Out-of-vocabulary tokens are ignored.
    #[must_use]
    pub fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
        for col in tokens.iter().filter_map(|token| self.column(token)) {
            *weights.entry(col).or_insert(0.0) += self.idf[col];
        }
        normalized_vector(self.len(), weights)
    }
}

/// Converts descriptions into a [`FeatureMatrix`].
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    tokenizer: Tokenizer,
    max_features: Option<usize>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfVectorizer {
    /// English stop words removed, vocabulary capped at
    /// [`DEFAULT_MAX_FEATURES`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::english(),
            max_features: Some(DEFAULT_MAX_FEATURES),
        }
    }

    #[must_use]
    pub fn with_stop_words(mut self, enabled: bool) -> Self {
        self.tokenizer = if enabled {
            Tokenizer::english()
        } else {
            Tokenizer::without_stop_words()
        };
        self
    }

    /// Keep at most `max` terms, the most frequent across the corpus.
    /// `None` keeps every term.
    #[must_use]
    pub fn with_max_features(mut self, max: Option<usize>) -> Self {
        self.max_features = max;
        self
    }

    /// Learn the vocabulary from `documents` and return it with one
    /// normalized row per document, in input order.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        documents: &[S],
    ) -> Result<(Vocabulary, FeatureMatrix)> {
        if documents.is_empty() {
            return Err(Error::EmptyCorpus(
                "cannot fit a vectorizer on zero documents".to_string(),
            ));
        }

        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| self.tokenizer.tokenize(doc.as_ref()))
            .collect();

        let vocabulary = self.build_vocabulary(&tokenized)?;

        let rows: Vec<SparseVector> = tokenized
            .iter()
            .map(|tokens| vocabulary.weigh(tokens))
            .collect();
        let matrix = FeatureMatrix::from_rows(&rows, vocabulary.len());

        log::info!(
            "Fitted TF-IDF over {} documents: {} terms, {} empty rows",
            matrix.n_rows(),
            vocabulary.len(),
            matrix.rows().filter(|row| row.nnz() == 0).count()
        );

        Ok((vocabulary, matrix))
    }

    fn build_vocabulary(&self, tokenized: &[Vec<String>]) -> Result<Vocabulary> {
        // BTreeMap keeps term iteration, and so column order, deterministic.
        let mut corpus_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in tokenized {
            for token in tokens {
                *corpus_freq.entry(token.as_str()).or_insert(0) += 1;
            }
        }

        if corpus_freq.is_empty() {
            return Err(Error::EmptyCorpus(
                "no description contains a usable term".to_string(),
            ));
        }

        let mut kept: Vec<&str> = match self.max_features {
            Some(max) if max < corpus_freq.len() => {
                let mut ranked: Vec<(&str, usize)> = corpus_freq.into_iter().collect();
                // Highest frequency first; the prior alphabetical order breaks ties.
                ranked.sort_by(|a, b| b.1.cmp(&a.1));
                ranked.truncate(max);
                ranked.into_iter().map(|(term, _)| term).collect()
            }
            _ => corpus_freq.into_keys().collect(),
        };
        kept.sort_unstable();

        let index: HashMap<String, usize> = kept
            .iter()
            .enumerate()
            .map(|(col, term)| ((*term).to_string(), col))
            .collect();

        let mut doc_freq = vec![0_usize; kept.len()];
        for tokens in tokenized {
            let unique: HashSet<usize> = tokens
                .iter()
                .filter_map(|token| index.get(token).copied())
                .collect();
            for col in unique {
                doc_freq[col] += 1;
            }
        }

        let n_docs = tokenized.len() as f64;
        let idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Ok(Vocabulary {
            terms: kept.into_iter().map(String::from).collect(),
            index,
            idf,
        })
    }
}
