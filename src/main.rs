use log::debug;
use recipe_scrape::{load_config, RecipeScraper};
use std::env;
use std::fs;
use std::io::{self, Read};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Usage: recipe-scrape <html-file|-> <url>
    let args: Vec<String> = env::args().collect();
    let path = args
        .get(1)
        .ok_or("Please provide an HTML file (or - for stdin) as the first argument")?;
    let url = args
        .get(2)
        .ok_or("Please provide the page URL as the second argument")?;

    let html = if path == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(path)?
    };

    let config = load_config()?;
    debug!("{:#?}", config);

    let scraper = RecipeScraper::from_config(config)?;
    let recipe = scraper.scrape(&html, url)?;
    println!("{}", serde_json::to_string_pretty(&recipe)?);

    Ok(())
}
