use anyhow::Result;
use earmark_etl::{config, Config};

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    let config_path = config::config_file_path();
    println!("Config file: {}", config_path.display());
    let exists = config_path.exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  catalog_path: {}", config.catalog_path.display());
    println!("  features_path: {}", config.features_path.display());
    println!("  join: {:?}", config.join);
    println!("  missing_description: {:?}", config.missing_description);
    println!("  require_rating: {}", config.require_rating);
    println!("  top_k: {}", config.top_k);
    println!("  min_rating: {}", config.min_rating);
    println!("  max_features: {}", config.max_features);
    println!("  stop_words: {}", config.stop_words);
    println!(
        "  column_aliases: {}",
        config
            .column_aliases
            .as_ref()
            .map_or_else(|| String::from("<not set>"), |path| path.display().to_string())
    );

    println!("\nPriority: CLI args > ENV vars (EARMARK_*) > Config file > Defaults");

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure earmark.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
