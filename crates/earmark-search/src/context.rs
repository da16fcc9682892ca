use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use earmark_core::{Catalog, CatalogEntry, Error, Result, TitleKey};

use crate::matrix::FeatureMatrix;
use crate::vectorize::{TfidfVectorizer, Vocabulary};

/// A fitted catalog: entries, vocabulary and feature matrix, built once and
/// read-only afterwards. Every query takes it by reference.
#[derive(Debug, Clone)]
pub struct RecommenderContext {
    catalog: Catalog,
    vocabulary: Vocabulary,
    matrix: FeatureMatrix,
    titles: HashMap<TitleKey, usize>,
    median_rating: Option<f64>,
    has_review_data: bool,
}

impl RecommenderContext {
    /// Fit `vectorizer` over the descriptions of `catalog`.
    pub fn fit(catalog: Catalog, vectorizer: &TfidfVectorizer) -> Result<Self> {
        if catalog.is_empty() {
            return Err(Error::EmptyCorpus("catalog has no entries".to_string()));
        }

        let descriptions: Vec<&str> = catalog
            .iter()
            .map(|entry| entry.description.as_str())
            .collect();
        let (vocabulary, matrix) = vectorizer.fit_transform(&descriptions)?;

        let mut titles = HashMap::with_capacity(catalog.len());
        for (row, entry) in catalog.iter().enumerate() {
            titles.entry(entry.title_key()).or_insert(row);
        }

        let median_rating = catalog.median_rating();
        let has_review_data = catalog.has_review_data();

        Ok(Self {
            catalog,
            vocabulary,
            matrix,
            titles,
            median_rating,
            has_review_data,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub fn matrix(&self) -> &FeatureMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    #[must_use]
    pub fn entry(&self, row: usize) -> Option<&CatalogEntry> {
        self.catalog.get(row)
    }

    #[must_use]
    pub fn median_rating(&self) -> Option<f64> {
        self.median_rating
    }

    #[must_use]
    pub fn has_review_data(&self) -> bool {
        self.has_review_data
    }

    /// Row of the first entry whose normalized title equals `title`.
    pub fn resolve(&self, title: &str) -> Result<usize> {
        self.titles
            .get(&TitleKey::new(title))
            .copied()
            .ok_or_else(|| Error::NotFound {
                entity: "title",
                key: title.trim().to_string(),
            })
    }
}

/// Holds the live context and lets a re-fit swap in atomically.
///
/// Readers clone the inner `Arc`, so queries already running keep the
/// context they started with.
#[derive(Debug)]
pub struct SharedContext {
    current: RwLock<Arc<RecommenderContext>>,
}

impl SharedContext {
    #[must_use]
    pub fn new(context: RecommenderContext) -> Self {
        Self {
            current: RwLock::new(Arc::new(context)),
        }
    }

    /// The context queries should run against right now.
    #[must_use]
    pub fn current(&self) -> Arc<RecommenderContext> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Install a freshly fitted context, returning the one it replaced.
    pub fn replace(&self, context: RecommenderContext) -> Arc<RecommenderContext> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(context))
    }
}
