use serde::{Deserialize, Serialize};
use std::fmt;

/// A listener rating, or the explicit absence of one.
///
/// Unrated entries are never compared as zero: they fail every rating
/// threshold instead of scoring below it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Rating {
    Rated(f64),
    #[default]
    Unrated,
}

impl Rating {
    /// Coerce a raw cell into a rating.
    ///
    /// Blank, non-numeric, non-finite and negative values (source exports use
    /// `-1` for "no ratings yet") become [`Rating::Unrated`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Self::Rated(value),
            _ => Self::Unrated,
        }
    }

    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Rated(value) => Some(value),
            Self::Unrated => None,
        }
    }

    #[must_use]
    pub fn is_rated(self) -> bool {
        matches!(self, Self::Rated(_))
    }

    /// Whether this rating passes a minimum threshold. Unrated never does.
    #[must_use]
    pub fn meets(self, threshold: f64) -> bool {
        self.value().is_some_and(|value| value >= threshold)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rated(value) => write!(f, "{value:.2}"),
            Self::Unrated => f.write_str("unrated"),
        }
    }
}
