pub mod config;
pub mod error;
pub mod extractors;
pub mod lookup;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod sites;

use log::debug;

pub use crate::config::{load_config, ScraperConfig};
pub use crate::error::{ExtractError, ScrapeError};
pub use crate::extractors::{OpenGraph, ParseOptions, ParsingContext, StructuredDataDocument};
pub use crate::lookup::Lookup;
pub use crate::model::{Nutrition, RecipeRecord};
pub use crate::pipeline::ExtractionPipeline;
pub use crate::sites::{SelectorOverride, SiteOverride, SiteRegistry};

/// Turns an HTML page into a [`RecipeRecord`]. Holds no per-page state.
#[derive(Debug, Default)]
pub struct RecipeScraper {
    config: ScraperConfig,
    registry: SiteRegistry,
}

impl RecipeScraper {
    pub fn new(config: ScraperConfig, registry: SiteRegistry) -> Self {
        Self { config, registry }
    }

    /// Build a scraper whose site overrides come from `config.sites`.
    pub fn from_config(config: ScraperConfig) -> Result<Self, ScrapeError> {
        let registry = SiteRegistry::from_config(&config)?;
        Ok(Self::new(config, registry))
    }

    pub fn scrape(&self, html: &str, url: &str) -> Result<RecipeRecord, ScrapeError> {
        debug!("Scraping recipe from {}", url);
        let context = ParsingContext::new(html, url);
        let structured = StructuredDataDocument::parse(&context, &self.config.parse_options());
        if !structured.has_recipe() {
            debug!("No Recipe entity found in structured data for {}", url);
        }

        let site = self.registry.lookup(url);
        if let Some(site) = site {
            debug!("Using site override for {}", site.host());
        }

        ExtractionPipeline::new(&context, structured, site)
            .with_opengraph_fallback(self.config.opengraph_fallback)
            .run()
    }
}

/// Scrape with default configuration and no site overrides.
pub fn scrape_html(html: &str, url: &str) -> Result<RecipeRecord, ScrapeError> {
    RecipeScraper::default().scrape(html, url)
}
