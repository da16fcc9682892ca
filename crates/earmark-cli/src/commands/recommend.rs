use anyhow::Result;
use serde_json::json;

use earmark_etl::Config;
use earmark_search::{HiddenGems, Query, RecommendationResult};

/// How many close title matches to offer when a title is not found.
const SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct RecommendOptions {
    pub k: usize,
    pub min_rating: Option<f64>,
    /// Set when only hidden gems should be recommended.
    pub max_reviews: Option<u64>,
    pub json: bool,
}

impl RecommendOptions {
    fn query(&self) -> Query {
        let mut query = Query::top(self.k);
        query.min_rating = self.min_rating;
        if let Some(max_reviews) = self.max_reviews {
            query = query.with_hidden_gems(HiddenGems { max_reviews });
        }
        query
    }
}

pub fn run_recommend(config: &Config, title: &str, options: &RecommendOptions) -> Result<()> {
    let context = super::load_context(config)?;

    let result = match context.recommend_with(title, &options.query()) {
        Ok(result) => result,
        Err(err) if err.is_not_found() => {
            println!("No book titled {:?} in the catalog.", title.trim());
            let suggestions = context.catalog().search_titles(title);
            if !suggestions.is_empty() {
                println!("\nDid you mean:");
                for suggestion in suggestions.iter().take(SUGGESTIONS) {
                    println!("  {suggestion}");
                }
            }
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if options.json {
        print_json(&result)?;
    } else {
        print_table(&result, options);
    }

    Ok(())
}

fn print_table(result: &RecommendationResult<'_>, options: &RecommendOptions) {
    println!(
        "\n🎧 Because you liked {} by {}\n",
        result.query.title, result.query.author
    );

    if result.is_empty() {
        if result.query.has_description() {
            println!("  No books passed the filters.");
            if let Some(min) = options.min_rating {
                println!("  Try a lower --min-rating than {min}, or --any-rating.");
            }
        } else {
            println!("  This book has no description to compare against.");
        }
        return;
    }

    for (rank, item) in result.iter().enumerate() {
        println!("  {:>2}. {} by {}", rank + 1, item.entry.title, item.entry.author);
        let reviews = item
            .entry
            .reviews
            .map(|count| format!(", {count} reviews"))
            .unwrap_or_default();
        println!(
            "      similarity {:.3}, rating {}{}",
            item.score, item.entry.rating, reviews
        );
    }

    if result.len() < options.k {
        println!("\n  Only {} of {} requested books matched.", result.len(), options.k);
    }
}

fn print_json(result: &RecommendationResult<'_>) -> Result<()> {
    let items: Vec<_> = result
        .iter()
        .map(|item| {
            json!({
                "title": item.entry.title,
                "author": item.entry.author,
                "score": item.score,
                "rating": item.entry.rating.value(),
                "reviews": item.entry.reviews,
                "listening_time": item.entry.listening_time,
                "price": item.entry.price,
            })
        })
        .collect();

    let output = json!({
        "query": {
            "title": result.query.title,
            "author": result.query.author,
        },
        "recommendations": items,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
