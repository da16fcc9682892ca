use std::path::Path;
use std::sync::Arc;

use earmark_core::{Catalog, ColumnAliases, Result};
use earmark_search::{RecommenderContext, SharedContext, TfidfVectorizer};

use crate::clean::{CleanReport, Cleaner};
use crate::config::Config;
use crate::load::{Loader, RawTable};

/// Loader, cleaner and vectorizer wired together.
///
/// Each run is a pure function of the two inputs and the settings, so
/// running twice over the same files yields identical contexts.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    loader: Loader,
    cleaner: Cleaner,
    vectorizer: TfidfVectorizer,
}

impl Pipeline {
    #[must_use]
    pub fn new(loader: Loader, cleaner: Cleaner, vectorizer: TfidfVectorizer) -> Self {
        Self {
            loader,
            cleaner,
            vectorizer,
        }
    }

    /// Build every stage from the settings in `config`, reading the column
    /// alias file if one is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let aliases = match &config.column_aliases {
            Some(path) => {
                log::info!("Loading column aliases from {}", path.display());
                ColumnAliases::load(path)?
            }
            None => ColumnAliases::default(),
        };

        let loader = Loader::new(aliases).with_join(config.join);
        let cleaner = Cleaner::new()
            .with_missing_description(config.missing_description)
            .with_require_rating(config.require_rating);
        let vectorizer = TfidfVectorizer::new()
            .with_stop_words(config.stop_words)
            .with_max_features(config.vocabulary_cap());

        Ok(Self::new(loader, cleaner, vectorizer))
    }

    /// Load and clean the two CSV exports without fitting the vectorizer.
    ///
    /// Listings and stats only need the catalog, and succeed even when no
    /// description holds a usable term.
    pub fn load_catalog(&self, primary: &Path, secondary: &Path) -> Result<Catalog> {
        let (primary, secondary) = read_tables(primary, secondary)?;
        self.clean_tables(primary, secondary)
            .map(|(catalog, _report)| catalog)
    }

    /// Same as [`Pipeline::load_catalog`] over tables already in memory,
    /// also returning the cleaning counts.
    pub fn clean_tables(
        &self,
        primary: RawTable,
        secondary: RawTable,
    ) -> Result<(Catalog, CleanReport)> {
        let records = self.loader.load_tables(primary, secondary)?;
        self.cleaner.clean(records)
    }

    /// Load, clean and fit from the two CSV exports.
    pub fn run(&self, primary: &Path, secondary: &Path) -> Result<RecommenderContext> {
        let (primary, secondary) = read_tables(primary, secondary)?;
        self.run_tables(primary, secondary)
            .map(|(context, _report)| context)
    }

    /// Same as [`Pipeline::run`] over tables already in memory, also
    /// returning the cleaning counts.
    pub fn run_tables(
        &self,
        primary: RawTable,
        secondary: RawTable,
    ) -> Result<(RecommenderContext, CleanReport)> {
        let (catalog, report) = self.clean_tables(primary, secondary)?;
        let context = RecommenderContext::fit(catalog, &self.vectorizer)?;

        log::info!(
            "Fitted {} entries over a vocabulary of {} terms",
            context.len(),
            context.vocabulary().len()
        );
        Ok((context, report))
    }

    /// Re-fit from the two exports and swap the result into `shared`.
    ///
    /// On failure the shared context is left untouched.
    pub fn refresh(
        &self,
        shared: &SharedContext,
        primary: &Path,
        secondary: &Path,
    ) -> Result<Arc<RecommenderContext>> {
        let context = self.run(primary, secondary)?;
        Ok(shared.replace(context))
    }
}

fn read_tables(primary: &Path, secondary: &Path) -> Result<(RawTable, RawTable)> {
    log::info!(
        "Building catalog from {} and {}",
        primary.display(),
        secondary.display()
    );
    Ok((RawTable::from_path(primary)?, RawTable::from_path(secondary)?))
}

/// Build a fitted context from the configured data files.
pub fn build_context(config: &Config) -> Result<RecommenderContext> {
    Pipeline::from_config(config)?.run(&config.catalog_path, &config.features_path)
}

/// Load and clean the configured data files into a catalog, without fitting.
pub fn build_catalog(config: &Config) -> Result<Catalog> {
    Pipeline::from_config(config)?.load_catalog(&config.catalog_path, &config.features_path)
}
