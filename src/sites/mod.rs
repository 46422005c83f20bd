//! Site-specific extraction overrides.
//!
//! A [`SiteOverride`] is consulted before any generic tier for the fields
//! it knows about. Overrides live in an explicitly built [`SiteRegistry`]
//! that callers hand to the scraper; nothing registers itself.

mod selector;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::extractors::ParsingContext;
use crate::lookup::Lookup;
use crate::pipeline::{Field, FieldValue};
use log::debug;
use std::collections::HashMap;
use url::Url;

pub use selector::SelectorOverride;

pub trait SiteOverride: Send + Sync {
    /// Host this override answers for, without a leading "www."
    fn host(&self) -> &str;

    /// First-tier value for `field`. `NotFound` for fields the site does
    /// not handle.
    fn extract(&self, field: Field, context: &ParsingContext) -> Lookup<FieldValue>;
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().to_lowercase();
    match host.strip_prefix("www.") {
        Some(bare) => bare.to_string(),
        None => host,
    }
}

/// Host of `url` in lower case with any leading "www." removed.
pub fn host_name(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    parsed.host_str().map(normalize_host)
}

/// Site overrides keyed by host.
#[derive(Default)]
pub struct SiteRegistry {
    sites: HashMap<String, Box<dyn SiteOverride>>,
}

impl SiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build `SelectorOverride`s for every `[sites."host"]` table.
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let mut registry = Self::new();
        let mut hosts: Vec<_> = config.sites.iter().collect();
        hosts.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for (host, selectors) in hosts {
            registry.register(SelectorOverride::from_selectors(host, selectors)?);
        }
        debug!("Site registry built with {} override(s)", registry.len());
        Ok(registry)
    }

    /// Add an override; a later override for the same host replaces the
    /// earlier one.
    pub fn register(&mut self, site: impl SiteOverride + 'static) -> &mut Self {
        self.sites.insert(normalize_host(site.host()), Box::new(site));
        self
    }

    pub fn lookup(&self, url: &str) -> Option<&dyn SiteOverride> {
        let host = host_name(url)?;
        self.sites.get(&host).map(|site| site.as_ref())
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

impl std::fmt::Debug for SiteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut hosts: Vec<&String> = self.sites.keys().collect();
        hosts.sort();
        f.debug_struct("SiteRegistry").field("hosts", &hosts).finish()
    }
}
