use anyhow::Result;
use earmark_core::GemFilter;
use earmark_etl::Config;

/// List highly rated books with few reviews.
pub fn run_gems(config: &Config, max_reviews: u64, min_rating: f64, limit: usize) -> Result<()> {
    let catalog = super::load_catalog(config)?;
    let filter = GemFilter {
        max_reviews,
        min_rating,
        limit,
    };

    let Some(gems) = catalog.hidden_gems(&filter) else {
        println!("The catalog has no review counts, so hidden gems cannot be listed.");
        println!("\nTry `earmark recommend <TITLE> --gems` instead.");
        return Ok(());
    };

    println!("\n💎 Hidden Gems (rated {min_rating}+, at most {max_reviews} reviews)\n");

    if gems.is_empty() {
        println!("  None found");
        return Ok(());
    }

    for entry in gems {
        let reviews = entry.reviews.unwrap_or_default();
        println!("  {} by {}", entry.title, entry.author);
        println!("      rating {}, {} reviews", entry.rating, reviews);
    }

    Ok(())
}
