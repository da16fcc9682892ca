use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::clean::MissingDescription;
use crate::load::JoinKind;

/// Configuration for earmark.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (EARMARK_* prefix)
/// 3. Config file (~/.config/earmark/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Primary catalog export (title, author, rating, reviews, price).
    ///
    /// Can be set via:
    /// - CLI: --catalog /path/to/file.csv
    /// - ENV: EARMARK_CATALOG_PATH
    /// - Config: catalog_path = "/path/to/file.csv"
    /// - Default: ~/.local/share/earmark/Audible_Catlog.csv
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Secondary export carrying descriptions and listening times.
    ///
    /// Can be set via:
    /// - CLI: --features /path/to/file.csv
    /// - ENV: EARMARK_FEATURES_PATH
    /// - Config: features_path = "/path/to/file.csv"
    /// - Default: ~/.local/share/earmark/Audible_Catlog_Advanced_Features.csv
    #[serde(default = "default_features_path")]
    pub features_path: PathBuf,

    /// How the two exports are joined: "inner" or "left".
    #[serde(default)]
    pub join: JoinKind,

    /// Rows without a description: "keep" or "drop".
    #[serde(default)]
    pub missing_description: MissingDescription,

    /// Drop unrated rows entirely.
    #[serde(default)]
    pub require_rating: bool,

    /// Number of recommendations returned when none is requested.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Rating threshold applied when none is requested.
    #[serde(default = "default_min_rating")]
    pub min_rating: f64,

    /// Vocabulary cap for the vectorizer; 0 keeps every term.
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Remove English stop words before vectorizing.
    #[serde(default = "default_stop_words")]
    pub stop_words: bool,

    /// Optional TOML file with extra column aliases.
    #[serde(default)]
    pub column_aliases: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            features_path: default_features_path(),
            join: JoinKind::default(),
            missing_description: MissingDescription::default(),
            require_rating: false,
            top_k: default_top_k(),
            min_rating: default_min_rating(),
            max_features: default_max_features(),
            stop_words: default_stop_words(),
            column_aliases: None,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/earmark/config.toml
    /// Reads environment variables with EARMARK_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("earmark");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration, then apply whichever data paths were given on
    /// the command line.
    pub fn load_with_paths(catalog: Option<PathBuf>, features: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::load()?;
        if let Some(catalog) = catalog {
            config.catalog_path = catalog;
        }
        if let Some(features) = features {
            config.features_path = features;
        }
        Ok(config)
    }

    /// Vocabulary cap as the vectorizer expects it.
    #[must_use]
    pub fn vocabulary_cap(&self) -> Option<usize> {
        (self.max_features > 0).then_some(self.max_features)
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("earmark")
}

fn default_catalog_path() -> PathBuf {
    data_dir().join("Audible_Catlog.csv")
}

fn default_features_path() -> PathBuf {
    data_dir().join("Audible_Catlog_Advanced_Features.csv")
}

fn default_top_k() -> usize {
    5
}

fn default_min_rating() -> f64 {
    3.5
}

fn default_max_features() -> usize {
    5000
}

fn default_stop_words() -> bool {
    true
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/earmark/config.toml
/// - macOS: ~/Library/Application Support/earmark/config.toml
/// - Windows: %APPDATA%\earmark\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("earmark")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Earmark Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (EARMARK_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Primary catalog export (book name, author, rating, number of reviews, price)
#
# Can also be set via:
# - CLI: earmark --catalog /path/to/Audible_Catlog.csv recommend ...
# - Environment: EARMARK_CATALOG_PATH=/path/to/Audible_Catlog.csv
#catalog_path = "/path/to/Audible_Catlog.csv"

# Secondary export with descriptions and listening times
#features_path = "/path/to/Audible_Catlog_Advanced_Features.csv"

# How the two exports are joined on (title, author): "inner" or "left"
join = "inner"

# Rows without a description: "keep" (listed, never recommended) or "drop"
missing_description = "keep"

# Drop rows without a numeric rating
require_rating = false

# Defaults for `earmark recommend`
top_k = 5
min_rating = 3.5

# Vectorizer settings (max_features = 0 keeps every term)
max_features = 5000
stop_words = true

# Extra header aliases, e.g.
#   [aliases]
#   title = ["Name of Book"]
#column_aliases = "/path/to/aliases.toml"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
