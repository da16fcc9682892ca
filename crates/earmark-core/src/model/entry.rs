use serde::{Deserialize, Serialize};

use crate::model::key::{EntryKey, TitleKey};
use crate::model::rating::Rating;

/// One audiobook in the merged catalog.
///
/// `title` and `author` keep their display casing; joins and lookups go
/// through [`CatalogEntry::key`]. An empty `description` keeps the entry in
/// listings but out of similarity ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub author: String,
    pub description: String,
    pub rating: Rating,

    /// Number of listener reviews, when the source carries it.
    pub reviews: Option<u64>,

    /// Listening time as printed by the source (e.g. "10 hours and 3 minutes").
    pub listening_time: Option<String>,

    pub price: Option<f64>,
    pub release_date: Option<String>,
}

impl CatalogEntry {
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            description: String::new(),
            rating: Rating::Unrated,
            reviews: None,
            listening_time: None,
            price: None,
            release_date: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Rating::Rated(rating);
        self
    }

    #[must_use]
    pub fn with_reviews(mut self, reviews: u64) -> Self {
        self.reviews = Some(reviews);
        self
    }

    #[must_use]
    pub fn with_listening_time(mut self, listening_time: impl Into<String>) -> Self {
        self.listening_time = Some(listening_time.into());
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    #[must_use]
    pub fn key(&self) -> EntryKey {
        EntryKey::new(&self.title, &self.author)
    }

    #[must_use]
    pub fn title_key(&self) -> TitleKey {
        TitleKey::new(&self.title)
    }

    #[must_use]
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// Parse a review count such as `"1,204"` or `"37.0"`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_count(raw: &str) -> Option<u64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if let Ok(count) = cleaned.parse::<u64>() {
        return Some(count);
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .map(|value| value as u64)
}

/// Parse a price such as `"468.00"` or `"$12.99"`.
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().ok()
}
