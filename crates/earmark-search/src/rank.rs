//! Similarity ranking over a fitted [`RecommenderContext`].
//!
//! A query resolves a title to its row, scores every other row by dot
//! product against it, filters, and keeps the top `k` by score. Ties keep
//! catalog order.

use earmark_core::{CatalogEntry, Result};

use crate::context::RecommenderContext;

/// Restricts candidates to low-popularity entries.
///
/// With review data, an entry qualifies when its review count is at most
/// `max_reviews`. Without any review data in the catalog, it qualifies when
/// rated strictly below the catalog's median rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HiddenGems {
    pub max_reviews: u64,
}

impl Default for HiddenGems {
    fn default() -> Self {
        Self { max_reviews: 200 }
    }
}

/// Parameters for one recommendation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    pub k: usize,
    pub min_rating: Option<f64>,
    pub hidden_gems: Option<HiddenGems>,
}

impl Query {
    #[must_use]
    pub fn top(k: usize) -> Self {
        Self {
            k,
            min_rating: None,
            hidden_gems: None,
        }
    }

    #[must_use]
    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    #[must_use]
    pub fn with_hidden_gems(mut self, gems: HiddenGems) -> Self {
        self.hidden_gems = Some(gems);
        self
    }
}

/// One ranked candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation<'a> {
    pub row: usize,
    pub entry: &'a CatalogEntry,
    pub score: f64,
}

/// Ranked candidates for a query, best first. May hold fewer than `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationResult<'a> {
    pub query_row: usize,
    pub query: &'a CatalogEntry,
    pub items: Vec<Recommendation<'a>>,
}

impl<'a> RecommendationResult<'a> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recommendation<'a>> {
        self.items.iter()
    }

    #[must_use]
    pub fn titles(&self) -> Vec<&'a str> {
        self.items.iter().map(|item| item.entry.title.as_str()).collect()
    }
}

impl<'a> IntoIterator for RecommendationResult<'a> {
    type Item = Recommendation<'a>;
    type IntoIter = std::vec::IntoIter<Recommendation<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl RecommenderContext {
    /// Top `k` entries most similar to `title`, optionally only those rated at
    /// least `min_rating`.
    pub fn recommend(
        &self,
        title: &str,
        k: usize,
        min_rating: Option<f64>,
    ) -> Result<RecommendationResult<'_>> {
        let mut query = Query::top(k);
        query.min_rating = min_rating;
        self.recommend_with(title, &query)
    }

    pub fn recommend_with(&self, title: &str, query: &Query) -> Result<RecommendationResult<'_>> {
        let query_row = self.resolve(title)?;
        Ok(self.rank_row(query_row, query))
    }

    /// `query_row` must come from [`RecommenderContext::resolve`].
    fn rank_row(&self, query_row: usize, query: &Query) -> RecommendationResult<'_> {
        let entries = self.catalog().entries();
        let query_entry = &entries[query_row];
        let matrix = self.matrix();

        let Some(query_vec) = matrix
            .row(query_row)
            .filter(|row| row.nnz() > 0)
            .map(|row| row.to_owned())
        else {
            log::debug!(
                "{:?} has no usable description, nothing to compare against",
                query_entry.title
            );
            return RecommendationResult {
                query_row,
                query: query_entry,
                items: Vec::new(),
            };
        };

        let scores = matrix.scores_against(&query_vec);
        let mut scored: Vec<(usize, f64)> = matrix
            .rows()
            .zip(scores)
            .enumerate()
            .filter(|(row, (vector, _))| *row != query_row && vector.nnz() > 0)
            .filter(|(row, _)| self.passes_filters(&entries[*row], query))
            .map(|(row, (_, score))| (row, score))
            .collect();

        // Stable: equal scores stay in catalog order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(query.k);

        let items = scored
            .into_iter()
            .map(|(row, score)| Recommendation {
                row,
                entry: &entries[row],
                score,
            })
            .collect();

        RecommendationResult {
            query_row,
            query: query_entry,
            items,
        }
    }

    fn passes_filters(&self, entry: &CatalogEntry, query: &Query) -> bool {
        if let Some(min) = query.min_rating {
            if !entry.rating.meets(min) {
                return false;
            }
        }
        match query.hidden_gems {
            Some(gems) => self.is_low_popularity(entry, gems),
            None => true,
        }
    }

    fn is_low_popularity(&self, entry: &CatalogEntry, gems: HiddenGems) -> bool {
        if self.has_review_data() {
            return entry
                .reviews
                .is_some_and(|reviews| reviews <= gems.max_reviews);
        }
        match (self.median_rating(), entry.rating.value()) {
            (Some(median), Some(rating)) => rating < median,
            _ => false,
        }
    }
}
