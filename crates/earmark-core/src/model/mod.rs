pub mod catalog;
pub mod entry;
pub mod key;
pub mod rating;

pub use catalog::{Catalog, CatalogStats, GemFilter};
pub use entry::CatalogEntry;
pub use key::{EntryKey, TitleKey};
pub use rating::Rating;
