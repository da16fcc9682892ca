use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use earmark_etl::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "earmark", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Primary catalog CSV (default: ~/.local/share/earmark/Audible_Catlog.csv)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Secondary CSV with descriptions
    /// (default: ~/.local/share/earmark/Audible_Catlog_Advanced_Features.csv)
    #[arg(long, global = true)]
    features: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Recommend audiobooks similar to a title
    ///
    /// Loads both catalog exports, joins them on (title, author), fits a
    /// TF-IDF model over the descriptions and ranks every other book by
    /// cosine similarity to the one named.
    ///
    /// Books without a description are never recommended. Title matching
    /// ignores case and surrounding whitespace; when several books share a
    /// title the first in catalog order is used.
    ///
    /// Filters:
    /// - --min-rating keeps books rated at least that value (unrated books
    ///   never pass)
    /// - --gems keeps low-popularity books: at most --max-reviews reviews,
    ///   or rated below the catalog median when no review column exists
    Recommend {
        /// Title of a book in the catalog
        title: String,

        /// Number of recommendations (default from config: 5)
        #[arg(short = 'k', long = "top")]
        k: Option<usize>,

        /// Minimum rating (default from config: 3.5)
        #[arg(long, conflicts_with = "any_rating")]
        min_rating: Option<f64>,

        /// Do not filter by rating
        #[arg(long)]
        any_rating: bool,

        /// Only recommend hidden gems
        #[arg(long)]
        gems: bool,

        /// Review count at or below which a book is a hidden gem (with --gems)
        #[arg(long, default_value_t = 200)]
        max_reviews: u64,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search catalog titles (case-insensitive substring)
    Search {
        /// Part of a title
        query: String,
    },
    /// List highly rated books with few reviews
    Gems {
        /// Maximum number of reviews
        #[arg(long, default_value_t = 200)]
        max_reviews: u64,

        /// Minimum rating
        #[arg(long, default_value_t = 4.5)]
        min_rating: f64,

        /// Number of books to list
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
    /// Show catalog statistics
    Stats {
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Write the example config file if none exists
    Init,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let load_config = || Config::load_with_paths(cli.catalog.clone(), cli.features.clone());

    match cli.command {
        Commands::Recommend {
            title,
            k,
            min_rating,
            any_rating,
            gems,
            max_reviews,
            json,
        } => {
            let config = load_config()?;
            let min_rating = if any_rating {
                None
            } else {
                Some(min_rating.unwrap_or(config.min_rating))
            };
            let options = commands::RecommendOptions {
                k: k.unwrap_or(config.top_k),
                min_rating,
                max_reviews: gems.then_some(max_reviews),
                json,
            };
            commands::run_recommend(&config, &title, &options)?;
        }
        Commands::Search { query } => {
            commands::run_search(&load_config()?, &query)?;
        }
        Commands::Gems {
            max_reviews,
            min_rating,
            limit,
        } => {
            commands::run_gems(&load_config()?, max_reviews, min_rating, limit)?;
        }
        Commands::Stats { json } => {
            commands::show_stats(&load_config()?, json)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&load_config()?)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
