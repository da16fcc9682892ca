use serde::{Deserialize, Serialize};
use std::fmt;

/// A trimmed, whitespace-collapsed, lower-cased string used for joining and
/// lookups. Display values keep their original casing elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TitleKey(String);

impl TitleKey {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(collapse_whitespace(raw).to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TitleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TitleKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The (title, author) pair two sources are merged on and duplicates are
/// collapsed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey {
    pub title: TitleKey,
    pub author: TitleKey,
}

impl EntryKey {
    #[must_use]
    pub fn new(title: &str, author: &str) -> Self {
        Self {
            title: TitleKey::new(title),
            author: TitleKey::new(author),
        }
    }
}

/// Trim and collapse runs of whitespace into single spaces.
#[must_use]
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
