//! Dataset loader: read two CSV exports and merge them on (title, author).
//!
//! Each source's headers are resolved through the [`ColumnAliases`] table
//! once, up front. A source without a recognizable title column is skipped;
//! if neither has one the load fails with [`Error::DataFormat`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use earmark_core::{ColumnAliases, ColumnMap, EntryKey, Error, Field, Result, TitleKey};

/// How rows of the primary source pair up with the secondary source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    /// Keep only rows present in both sources.
    #[default]
    Inner,
    /// Keep every primary row; the secondary only fills gaps.
    Left,
}

/// A CSV file as read: headers plus string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(path.display().to_string(), file)?;
        log::info!("Read {} rows from {}", table.rows.len(), path.display());
        Ok(table)
    }

    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = reader
            .headers()?
            .iter()
            .map(String::from)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(String::from).collect());
        }

        Ok(Self {
            name: name.into(),
            headers,
            rows,
        })
    }
}

/// One source row reduced to the canonical fields it carries. Blank cells
/// are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    values: HashMap<Field, String>,
}

impl RawRecord {
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Set a field; blank values are ignored.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        if !value.trim().is_empty() {
            self.values.insert(field, value);
        }
    }

    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Fill every field this record lacks from `other`.
    pub fn fill_from(&mut self, other: &Self) {
        for (field, value) in &other.values {
            self.values
                .entry(*field)
                .or_insert_with(|| value.clone());
        }
    }

    fn from_row(row: &[String], columns: &ColumnMap) -> Self {
        let mut record = Self::default();
        for field in columns.fields() {
            if let Some(cell) = columns.get(field).and_then(|idx| row.get(idx)) {
                record.set(field, cell.as_str());
            }
        }
        record
    }
}

/// A source whose columns have been resolved.
#[derive(Debug)]
struct Source {
    name: String,
    columns: ColumnMap,
    records: Vec<RawRecord>,
}

impl Source {
    fn resolve(table: RawTable, aliases: &ColumnAliases) -> Option<Self> {
        let columns = aliases.resolve(&table.headers);
        if !columns.contains(Field::Title) {
            log::warn!(
                "No title column in {} (headers: {:?}), skipping source",
                table.name,
                table.headers
            );
            return None;
        }
        log::debug!("Resolved columns for {}: {:?}", table.name, columns.fields());

        let records = table
            .rows
            .iter()
            .map(|row| RawRecord::from_row(row, &columns))
            .collect();
        Some(Self {
            name: table.name,
            columns,
            records,
        })
    }
}

/// Reads and merges the two catalog sources.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    aliases: ColumnAliases,
    join: JoinKind,
}

impl Loader {
    #[must_use]
    pub fn new(aliases: ColumnAliases) -> Self {
        Self {
            aliases,
            join: JoinKind::default(),
        }
    }

    #[must_use]
    pub fn with_join(mut self, join: JoinKind) -> Self {
        self.join = join;
        self
    }

    pub fn load_paths(&self, primary: &Path, secondary: &Path) -> Result<Vec<RawRecord>> {
        let primary = RawTable::from_path(primary)?;
        let secondary = RawTable::from_path(secondary)?;
        self.load_tables(primary, secondary)
    }

    /// Resolve both tables and merge them into one record list, in primary
    /// row order.
    pub fn load_tables(&self, primary: RawTable, secondary: RawTable) -> Result<Vec<RawRecord>> {
        let names = format!("{} and {}", primary.name, secondary.name);
        let primary = Source::resolve(primary, &self.aliases);
        let secondary = Source::resolve(secondary, &self.aliases);

        let records = match (primary, secondary) {
            (Some(primary), Some(secondary)) => self.merge(primary, secondary),
            (Some(only), None) | (None, Some(only)) => {
                log::warn!("Loading {} alone, nothing to merge with", only.name);
                only.records
            }
            (None, None) => {
                return Err(Error::DataFormat(format!(
                    "neither {names} has a recognizable title column"
                )));
            }
        };

        log::info!("Loaded {} merged rows", records.len());
        Ok(records)
    }

    fn merge(&self, primary: Source, secondary: Source) -> Vec<RawRecord> {
        // Join on author too when both sides carry one.
        let with_author =
            primary.columns.contains(Field::Author) && secondary.columns.contains(Field::Author);
        if !with_author {
            log::warn!(
                "{} and {} do not both have an author column, joining on title only",
                primary.name,
                secondary.name
            );
        }
        let key_of = |record: &RawRecord| -> Option<EntryKey> {
            let title = TitleKey::new(record.get(Field::Title)?);
            let author = if with_author {
                TitleKey::new(record.get(Field::Author)?)
            } else {
                TitleKey::new("")
            };
            Some(EntryKey { title, author })
        };

        let mut index: HashMap<EntryKey, Vec<usize>> = HashMap::new();
        for (idx, record) in secondary.records.iter().enumerate() {
            if let Some(key) = key_of(record) {
                index.entry(key).or_default().push(idx);
            }
        }

        let mut merged = Vec::with_capacity(primary.records.len());
        let mut unmatched = 0_usize;
        for record in primary.records {
            let matches = key_of(&record).and_then(|key| index.get(&key));
            match matches {
                Some(rows) => {
                    for &idx in rows {
                        let mut joined = record.clone();
                        joined.fill_from(&secondary.records[idx]);
                        merged.push(joined);
                    }
                }
                None => {
                    unmatched += 1;
                    if self.join == JoinKind::Left {
                        merged.push(record);
                    }
                }
            }
        }

        log::info!(
            "{:?} join of {} with {}: {} rows, {} primary rows without a match",
            self.join,
            primary.name,
            secondary.name,
            merged.len(),
            unmatched
        );
        merged
    }
}
