//! Cleaner: turn merged raw records into the canonical catalog.
//!
//! Steps, in order:
//! 1. normalize the (title, author) join key; display values keep casing
//! 2. drop rows missing title or author
//! 3. apply the missing-description policy
//! 4. coerce ratings, unparseable values becoming `Unrated`, and apply the
//!    require-rating policy
//! 5. drop duplicate keys among the surviving rows, keeping the first

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use earmark_core::model::entry::{parse_count, parse_price};
use earmark_core::model::key::collapse_whitespace;
use earmark_core::{Catalog, CatalogEntry, Error, Field, Rating, Result};

use crate::load::RawRecord;

/// What to do with rows that have no description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingDescription {
    /// Keep the row with an empty description. It shows up in listings and
    /// stats but is never a similarity candidate.
    #[default]
    Keep,
    /// Remove the row from the catalog.
    Drop,
}

/// Row counts at each cleaning step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub input: usize,
    pub missing_key: usize,
    pub duplicates: usize,
    pub missing_description: usize,
    pub unrated: usize,
    pub kept: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Cleaner {
    missing_description: MissingDescription,
    require_rating: bool,
}

impl Cleaner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_missing_description(mut self, policy: MissingDescription) -> Self {
        self.missing_description = policy;
        self
    }

    /// Drop unrated rows instead of keeping them as `Unrated`.
    #[must_use]
    pub fn with_require_rating(mut self, require: bool) -> Self {
        self.require_rating = require;
        self
    }

    pub fn clean(&self, records: Vec<RawRecord>) -> Result<(Catalog, CleanReport)> {
        let mut report = CleanReport {
            input: records.len(),
            ..CleanReport::default()
        };
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(records.len());

        for record in records {
            let (Some(title), Some(author)) = (record.get(Field::Title), record.get(Field::Author))
            else {
                report.missing_key += 1;
                continue;
            };
            let entry = CatalogEntry::new(collapse_whitespace(title), collapse_whitespace(author));

            let description = record.get(Field::Description).map(str::trim).unwrap_or("");
            if description.is_empty() && self.missing_description == MissingDescription::Drop {
                report.missing_description += 1;
                continue;
            }

            let rating = record.get(Field::Rating).map_or(Rating::Unrated, Rating::parse);
            if self.require_rating && !rating.is_rated() {
                report.unrated += 1;
                continue;
            }

            // Only rows that survive the policies claim their key.
            if !seen.insert(entry.key()) {
                report.duplicates += 1;
                continue;
            }

            entries.push(CatalogEntry {
                description: description.to_string(),
                rating,
                reviews: record.get(Field::Reviews).and_then(parse_count),
                listening_time: record.get(Field::ListeningTime).map(collapse_whitespace),
                price: record.get(Field::Price).and_then(parse_price),
                release_date: record.get(Field::ReleaseDate).map(|d| d.trim().to_string()),
                ..entry
            });
        }

        report.kept = entries.len();
        log::info!(
            "Cleaned {} rows: kept {}, dropped {} without title/author, {} duplicates, \
             {} without description, {} unrated",
            report.input,
            report.kept,
            report.missing_key,
            report.duplicates,
            report.missing_description,
            report.unrated
        );

        if entries.is_empty() {
            return Err(Error::EmptyCorpus(format!(
                "all {} rows were dropped during cleaning",
                report.input
            )));
        }

        Ok((Catalog::new(entries), report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, author: &str, description: &str, rating: &str) -> RawRecord {
        RawRecord::default()
            .with(Field::Title, title)
            .with(Field::Author, author)
            .with(Field::Description, description)
            .with(Field::Rating, rating)
    }

    #[test]
    fn test_duplicates_collapse_to_first() {
        let (catalog, report) = Cleaner::new()
            .clean(vec![
                record("Dune", "Frank Herbert", "first", "4.5"),
                record(" DUNE ", "frank  herbert", "second", "4.0"),
                record("Dune", "Brian Herbert", "other author", "3.0"),
            ])
            .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(catalog.get(0).unwrap().description, "first");
        assert_eq!(catalog.get(1).unwrap().author, "Brian Herbert");
    }

    #[test]
    fn test_display_values_keep_casing() {
        let (catalog, _) = Cleaner::new()
            .clean(vec![record("  The   Hobbit ", "J.R.R.  Tolkien", "d", "4")])
            .unwrap();
        let entry = catalog.get(0).unwrap();
        assert_eq!(entry.title, "The Hobbit");
        assert_eq!(entry.author, "J.R.R. Tolkien");
    }

    #[test]
    fn test_missing_title_or_author_dropped() {
        let (catalog, report) = Cleaner::new()
            .clean(vec![
                record("", "Someone", "d", "4"),
                record("Orphan", "", "d", "4"),
                record("Kept", "Author", "d", "4"),
            ])
            .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(report.missing_key, 2);
    }

    #[test]
    fn test_missing_description_kept_by_default() {
        let (catalog, report) = Cleaner::new()
            .clean(vec![record("A", "x", "", "4"), record("B", "y", "words", "4")])
            .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(report.missing_description, 0);
        assert!(!catalog.get(0).unwrap().has_description());
    }

    #[test]
    fn test_missing_description_drop_policy() {
        let (catalog, report) = Cleaner::new()
            .with_missing_description(MissingDescription::Drop)
            .clean(vec![record("A", "x", "  ", "4"), record("B", "y", "words", "4")])
            .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(report.missing_description, 1);
        assert_eq!(catalog.get(0).unwrap().title, "B");
    }

    #[test]
    fn test_dropped_description_does_not_shadow_later_duplicate() {
        let (catalog, report) = Cleaner::new()
            .with_missing_description(MissingDescription::Drop)
            .clean(vec![
                record("Dune", "Frank Herbert", "", "4.5"),
                record("Dune", "Frank Herbert", "desert planet politics", "4.5"),
                record("Other", "y", "words", "4"),
            ])
            .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().title, "Dune");
        assert_eq!(catalog.get(0).unwrap().description, "desert planet politics");
        assert_eq!(report.missing_description, 1);
        assert_eq!(report.duplicates, 0);
    }

    #[test]
    fn test_unrated_row_does_not_shadow_later_duplicate() {
        let (catalog, report) = Cleaner::new()
            .with_require_rating(true)
            .clean(vec![
                record("Dune", "Frank Herbert", "desert planet", "n/a"),
                record("Dune", "Frank Herbert", "desert planet", "4.5"),
                record("Other", "y", "words", "4"),
            ])
            .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().rating, Rating::Rated(4.5));
        assert_eq!(report.unrated, 1);
        assert_eq!(report.duplicates, 0);
    }

    #[test]
    fn test_rating_coercion() {
        let (catalog, _) = Cleaner::new()
            .clean(vec![
                record("A", "x", "d", "4.7"),
                record("B", "x", "d", "not rated"),
                record("C", "x", "d", ""),
            ])
            .unwrap();
        assert_eq!(catalog.get(0).unwrap().rating, Rating::Rated(4.7));
        assert_eq!(catalog.get(1).unwrap().rating, Rating::Unrated);
        assert_eq!(catalog.get(2).unwrap().rating, Rating::Unrated);
    }

    #[test]
    fn test_require_rating_drops_unrated() {
        let (catalog, report) = Cleaner::new()
            .with_require_rating(true)
            .clean(vec![record("A", "x", "d", "4.7"), record("B", "x", "d", "?")])
            .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(report.unrated, 1);
    }

    #[test]
    fn test_metadata_carried_through() {
        let raw = record("A", "x", "d", "4")
            .with(Field::Reviews, "1,024")
            .with(Field::Price, "468.00")
            .with(Field::ListeningTime, "7 hours and  2 minutes");
        let (catalog, _) = Cleaner::new().clean(vec![raw]).unwrap();
        let entry = catalog.get(0).unwrap();
        assert_eq!(entry.reviews, Some(1_024));
        assert_eq!(entry.price, Some(468.0));
        assert_eq!(entry.listening_time.as_deref(), Some("7 hours and 2 minutes"));
    }

    #[test]
    fn test_everything_dropped_is_empty_corpus() {
        let err = Cleaner::new()
            .clean(vec![record("", "", "d", "4")])
            .unwrap_err();
        assert!(matches!(err, Error::EmptyCorpus(_)));
    }
}
