use anyhow::Result;
use serde_json::json;

use earmark_etl::Config;

pub fn show_stats(config: &Config, as_json: bool) -> Result<()> {
    let catalog = super::load_catalog(config)?;
    let stats = catalog.stats();
    let described = catalog
        .iter()
        .filter(|entry| entry.has_description())
        .count();

    if as_json {
        let output = json!({
            "books": stats.books,
            "described": described,
            "rated": stats.rated,
            "average_rating": stats.average_rating,
            "total_reviews": stats.total_reviews,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("\n📊 Earmark Catalog\n");
    println!("  Catalog: {}", config.catalog_path.display());
    println!("  Features: {}", config.features_path.display());
    println!("  Books: {}", stats.books);
    println!("  With description: {described}");
    println!("  Rated: {}", stats.rated);
    match stats.average_rating {
        Some(average) => println!("  Average rating: {average:.2}"),
        None => println!("  Average rating: n/a"),
    }
    if let Some(total) = stats.total_reviews {
        println!("  Total reviews: {total}");
    }

    Ok(())
}
