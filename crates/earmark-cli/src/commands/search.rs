use anyhow::Result;
use earmark_etl::Config;

pub fn run_search(config: &Config, query: &str) -> Result<()> {
    let catalog = super::load_catalog(config)?;
    let titles = catalog.search_titles(query);

    if titles.is_empty() {
        println!("No titles contain {:?}", query.trim());
        return Ok(());
    }

    for title in &titles {
        println!("{title}");
    }
    log::debug!("{} titles matched {:?}", titles.len(), query);

    Ok(())
}
