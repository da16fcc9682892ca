//! Load, clean and fit pipeline for earmark.
//!
//! Reads the two catalog exports, merges them on (title, author), cleans
//! the merged rows into a canonical catalog and fits the similarity context
//! the ranker queries.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod clean;
pub mod config;
pub mod load;
pub mod pipeline;

pub use clean::{CleanReport, Cleaner, MissingDescription};
pub use config::Config;
pub use load::{JoinKind, Loader, RawRecord, RawTable};
pub use pipeline::{build_catalog, build_context, Pipeline};
