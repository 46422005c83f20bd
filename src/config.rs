use crate::extractors::ParseOptions;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Scraper configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ScraperConfig {
    /// Consult og:* meta tags when structured data has no value
    #[serde(default = "default_true")]
    pub opengraph_fallback: bool,
    /// Attempt to repair JSON-LD blocks that fail strict parsing
    #[serde(default = "default_true")]
    pub repair_json: bool,
    /// Read schema.org microdata in addition to JSON-LD
    #[serde(default = "default_true")]
    pub microdata: bool,
    /// Per-host CSS selector overrides: host -> field key -> selector
    #[serde(default)]
    pub sites: HashMap<String, HashMap<String, String>>,
}

fn default_true() -> bool {
    true
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            opengraph_fallback: true,
            repair_json: true,
            microdata: true,
            sites: HashMap::new(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_SCRAPE__ prefix
    /// 2. recipe_scrape.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_SCRAPE__OPENGRAPH_FALLBACK=false
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            repair_json: self.repair_json,
            microdata: self.microdata,
        }
    }
}

/// Load configuration from `recipe_scrape.toml` (optional) and
/// `RECIPE_SCRAPE__*` environment variables.
pub fn load_config() -> Result<ScraperConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe_scrape").required(false))
        // Use double underscore for nested: RECIPE_SCRAPE__SITES__EXAMPLE_COM__TITLE
        .add_source(
            Environment::with_prefix("RECIPE_SCRAPE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
