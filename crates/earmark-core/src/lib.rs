//! Core domain model for earmark.
//!
//! This crate defines the catalog entry model, the rating sentinel, the
//! normalized join keys, the column alias table used to recognise tabular
//! headers, and the shared error type.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod columns;
pub mod error;
pub mod model;

pub use columns::{ColumnAliases, ColumnMap, Field};
pub use error::{Error, Result};
pub use model::{Catalog, CatalogEntry, CatalogStats, EntryKey, GemFilter, Rating, TitleKey};
