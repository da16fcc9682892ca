use serde::Serialize;

use crate::model::entry::CatalogEntry;
use crate::model::key::TitleKey;

/// The cleaned, canonical entry table. Row order is fixed once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

/// Thresholds for the catalog-wide hidden gems listing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GemFilter {
    pub max_reviews: u64,
    pub min_rating: f64,
    pub limit: usize,
}

impl Default for GemFilter {
    fn default() -> Self {
        Self {
            max_reviews: 200,
            min_rating: 4.5,
            limit: 20,
        }
    }
}

/// Summary figures for the catalog header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CatalogStats {
    pub books: usize,
    pub rated: usize,
    pub average_rating: Option<f64>,
    pub total_reviews: Option<u64>,
}

impl Catalog {
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, row: usize) -> Option<&CatalogEntry> {
        self.entries.get(row)
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    /// Whether any entry carries a review count.
    #[must_use]
    pub fn has_review_data(&self) -> bool {
        self.entries.iter().any(|entry| entry.reviews.is_some())
    }

    /// Median over rated entries; `None` when nothing is rated.
    #[must_use]
    pub fn median_rating(&self) -> Option<f64> {
        let mut ratings: Vec<f64> = self
            .entries
            .iter()
            .filter_map(|entry| entry.rating.value())
            .collect();
        if ratings.is_empty() {
            return None;
        }
        ratings.sort_by(f64::total_cmp);
        let mid = ratings.len() / 2;
        if ratings.len() % 2 == 0 {
            Some((ratings[mid - 1] + ratings[mid]) / 2.0)
        } else {
            Some(ratings[mid])
        }
    }

    /// Distinct display titles containing `query` (case-insensitive), sorted.
    ///
    /// An empty query lists every title.
    #[must_use]
    pub fn search_titles(&self, query: &str) -> Vec<&str> {
        let needle = TitleKey::new(query);
        let mut titles: Vec<&str> = self
            .entries
            .iter()
            .filter(|entry| entry.title_key().as_str().contains(needle.as_str()))
            .map(|entry| entry.title.as_str())
            .collect();
        titles.sort_unstable();
        titles.dedup();
        titles
    }

    /// Highly rated entries with few reviews, best rated first.
    ///
    /// Returns `None` when the catalog has no review data at all.
    #[must_use]
    pub fn hidden_gems(&self, filter: &GemFilter) -> Option<Vec<&CatalogEntry>> {
        if !self.has_review_data() {
            return None;
        }
        let mut gems: Vec<&CatalogEntry> = self
            .entries
            .iter()
            .filter(|entry| {
                entry.rating.meets(filter.min_rating)
                    && entry
                        .reviews
                        .is_some_and(|reviews| reviews <= filter.max_reviews)
            })
            .collect();
        gems.sort_by(|a, b| {
            let a = a.rating.value().unwrap_or(f64::NEG_INFINITY);
            let b = b.rating.value().unwrap_or(f64::NEG_INFINITY);
            b.total_cmp(&a)
        });
        gems.truncate(filter.limit);
        Some(gems)
    }

    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        let ratings: Vec<f64> = self
            .entries
            .iter()
            .filter_map(|entry| entry.rating.value())
            .collect();
        let average_rating = if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
        };
        let total_reviews = self
            .has_review_data()
            .then(|| self.entries.iter().filter_map(|entry| entry.reviews).sum());

        CatalogStats {
            books: self.entries.len(),
            rated: ratings.len(),
            average_rating,
            total_reviews,
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<Vec<CatalogEntry>> for Catalog {
    fn from(entries: Vec<CatalogEntry>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(vec![
            CatalogEntry::new("Dune", "Frank Herbert")
                .with_rating(4.6)
                .with_reviews(9_000),
            CatalogEntry::new("Dune Messiah", "Frank Herbert")
                .with_rating(4.7)
                .with_reviews(120),
            CatalogEntry::new("The Quiet Garden", "A. Nobody")
                .with_rating(4.9)
                .with_reviews(12),
            CatalogEntry::new("Unrated Thing", "Someone").with_reviews(3),
            CatalogEntry::new("Mediocre", "Someone Else")
                .with_rating(3.1)
                .with_reviews(40),
        ])
    }

    #[test]
    fn test_search_titles_is_case_insensitive_and_sorted() {
        let catalog = sample();
        assert_eq!(catalog.search_titles("DUNE"), vec!["Dune", "Dune Messiah"]);
        assert_eq!(catalog.search_titles("").len(), 5);
        assert!(catalog.search_titles("nothing like this").is_empty());
    }

    #[test]
    fn test_hidden_gems_listing() {
        let catalog = sample();
        let gems = catalog.hidden_gems(&GemFilter::default()).unwrap();
        let titles: Vec<&str> = gems.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["The Quiet Garden", "Dune Messiah"]);
    }

    #[test]
    fn test_hidden_gems_respects_limit() {
        let catalog = sample();
        let filter = GemFilter {
            max_reviews: 10_000,
            min_rating: 0.0,
            limit: 2,
        };
        let gems = catalog.hidden_gems(&filter).unwrap();
        assert_eq!(gems.len(), 2);
        assert_eq!(gems[0].title, "The Quiet Garden");
    }

    #[test]
    fn test_hidden_gems_without_review_data() {
        let catalog = Catalog::new(vec![CatalogEntry::new("A", "B").with_rating(5.0)]);
        assert!(catalog.hidden_gems(&GemFilter::default()).is_none());
    }

    #[test]
    fn test_median_rating() {
        let median = sample().median_rating().unwrap();
        assert!((median - 4.65).abs() < 1e-9);
        let odd = Catalog::new(vec![
            CatalogEntry::new("A", "x").with_rating(1.0),
            CatalogEntry::new("B", "x").with_rating(3.0),
            CatalogEntry::new("C", "x").with_rating(2.0),
        ]);
        assert_eq!(odd.median_rating(), Some(2.0));
        assert_eq!(Catalog::default().median_rating(), None);
    }

    #[test]
    fn test_stats() {
        let stats = sample().stats();
        assert_eq!(stats.books, 5);
        assert_eq!(stats.rated, 4);
        assert_eq!(stats.total_reviews, Some(9_175));
        let avg = stats.average_rating.unwrap();
        assert!((avg - 4.325).abs() < 1e-9);
    }
}
