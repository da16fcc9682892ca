//! Column alias table for recognising catalog fields in tabular headers.
//!
//! Source exports name the same field differently ("Book Name", "title",
//! "Book_Title"). Each canonical [`Field`] carries a list of accepted header
//! aliases, compared after normalization (case, whitespace, `_` and `-`).
//! Fields still unresolved after the alias pass fall back to a keyword
//! search over the remaining headers.
//!
//! The built-in table can be extended from a TOML file:
//!
//! ```toml
//! [aliases]
//! title = ["Name of Book"]
//! reviews = ["Listener Count"]
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// A canonical catalog field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Author,
    Description,
    Rating,
    Reviews,
    ListeningTime,
    Price,
    ReleaseDate,
}

impl Field {
    pub const ALL: [Self; 8] = [
        Self::Title,
        Self::Author,
        Self::Description,
        Self::Rating,
        Self::Reviews,
        Self::ListeningTime,
        Self::Price,
        Self::ReleaseDate,
    ];

    /// Canonical name, matching the keys used in alias files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Description => "description",
            Self::Rating => "rating",
            Self::Reviews => "reviews",
            Self::ListeningTime => "listening_time",
            Self::Price => "price",
            Self::ReleaseDate => "release_date",
        }
    }

    /// Look up a field by its canonical name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

const DEFAULT_ALIASES: &[(Field, &[&str])] = &[
    (Field::Title, &["book name", "title", "book title", "name", "book"]),
    (Field::Author, &["author", "authors", "author name", "writer", "written by"]),
    (
        Field::Description,
        &["description", "desc", "summary", "synopsis", "blurb", "about"],
    ),
    (
        Field::Rating,
        &["rating", "ratings", "avg rating", "average rating", "stars"],
    ),
    (
        Field::Reviews,
        &["number of reviews", "reviews", "review count", "num reviews", "reviews count"],
    ),
    (
        Field::ListeningTime,
        &["listening time", "listen time", "duration", "length", "runtime"],
    ),
    (Field::Price, &["price", "cost"]),
    (Field::ReleaseDate, &["release date", "released", "publication date"]),
];

/// Substrings that identify a field when no alias matched exactly.
const KEYWORDS: &[(Field, &[&str])] = &[
    (Field::Title, &["title"]),
    (Field::Author, &["author"]),
    (Field::Description, &["desc"]),
    (Field::Rating, &["rating"]),
    (Field::Reviews, &["review"]),
    (Field::ListeningTime, &["listening", "duration"]),
    (Field::Price, &["price"]),
    (Field::ReleaseDate, &["release"]),
];

/// Normalize a header or alias for comparison.
fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ---------------------------------------------------------------------------
// Alias table
// ---------------------------------------------------------------------------

/// Canonical field → accepted header aliases.
#[derive(Debug, Clone)]
pub struct ColumnAliases {
    aliases: HashMap<Field, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AliasFile {
    #[serde(default)]
    aliases: HashMap<String, Vec<String>>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        let aliases = DEFAULT_ALIASES
            .iter()
            .map(|(field, names)| {
                (
                    *field,
                    names.iter().map(|name| normalize_header(name)).collect(),
                )
            })
            .collect();
        Self { aliases }
    }
}

impl ColumnAliases {
    /// The built-in table extended with the aliases from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// The built-in table extended with aliases parsed from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: AliasFile = toml::from_str(contents)?;
        let mut table = Self::default();
        for (name, extra) in file.aliases {
            let field = Field::from_name(&name).ok_or_else(|| {
                Error::DataFormat(format!("unknown field {name:?} in alias file"))
            })?;
            for alias in extra {
                table.add(field, &alias);
            }
        }
        Ok(table)
    }

    /// Accept one more header name for `field`.
    pub fn add(&mut self, field: Field, alias: &str) {
        let alias = normalize_header(alias);
        let names = self.aliases.entry(field).or_default();
        if !names.contains(&alias) {
            names.push(alias);
        }
    }

    #[must_use]
    pub fn aliases_for(&self, field: Field) -> &[String] {
        self.aliases.get(&field).map_or(&[], Vec::as_slice)
    }

    /// Map each recognisable field to a column index in `headers`.
    ///
    /// Exact alias matches are resolved first for every field, then keyword
    /// matches claim whatever columns are still free. A column is assigned to
    /// at most one field, and the leftmost candidate wins.
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S]) -> ColumnMap {
        let normalized: Vec<String> = headers
            .iter()
            .map(|header| normalize_header(header.as_ref()))
            .collect();
        let mut map = ColumnMap::default();

        for field in Field::ALL {
            let aliases = self.aliases_for(field);
            let hit = normalized
                .iter()
                .enumerate()
                .find(|(idx, header)| !map.is_claimed(*idx) && aliases.contains(*header));
            if let Some((idx, _)) = hit {
                map.indices.insert(field, idx);
            }
        }

        for &(field, keywords) in KEYWORDS {
            if map.contains(field) {
                continue;
            }
            let hit = normalized.iter().enumerate().find(|(idx, header)| {
                !map.is_claimed(*idx) && keywords.iter().any(|kw| header.contains(*kw))
            });
            if let Some((idx, _)) = hit {
                log::debug!(
                    "Column {:?} matched field {} by keyword",
                    headers[idx].as_ref(),
                    field
                );
                map.indices.insert(field, idx);
            }
        }

        map
    }
}

// ---------------------------------------------------------------------------
// Resolved mapping
// ---------------------------------------------------------------------------

/// Field → column index for one concrete header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    indices: HashMap<Field, usize>,
}

impl ColumnMap {
    #[must_use]
    pub fn get(&self, field: Field) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.indices.contains_key(&field)
    }

    fn is_claimed(&self, idx: usize) -> bool {
        self.indices.values().any(|&claimed| claimed == idx)
    }

    /// Fields resolved, in canonical order.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.contains(*field))
            .collect()
    }
}
