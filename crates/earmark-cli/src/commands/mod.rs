pub mod config;
pub mod gems;
pub mod recommend;
pub mod search;
pub mod stats;

use anyhow::{Context, Result};
use earmark_core::Catalog;
use earmark_etl::{build_catalog, build_context, Config};
use earmark_search::RecommenderContext;

pub use gems::run_gems;
pub use recommend::{run_recommend, RecommendOptions};
pub use search::run_search;
pub use stats::show_stats;

fn failed_build(config: &Config) -> String {
    format!(
        "Failed to build catalog from {} and {}",
        config.catalog_path.display(),
        config.features_path.display()
    )
}

/// Load, clean and fit the configured catalog.
fn load_context(config: &Config) -> Result<RecommenderContext> {
    build_context(config).with_context(|| failed_build(config))
}

/// Load and clean the configured catalog; listings never need the model.
fn load_catalog(config: &Config) -> Result<Catalog> {
    build_catalog(config).with_context(|| failed_build(config))
}
