use crate::error::ExtractError;
use crate::lookup::Lookup;
use crate::parsers::text::normalize_string;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;

static META_PROPERTY: Lazy<Selector> = Lazy::new(|| Selector::parse("meta[property]").unwrap());
static CANONICAL_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link[rel='canonical']").unwrap());

/// `og:*` meta tags plus the `<html lang>` and canonical link of a page.
///
/// `site_name` and `image` are strict: they fail when absent because nothing
/// is tried after OpenGraph for them. Every other accessor is soft and
/// reports a plain `NotFound`.
#[derive(Debug, Default)]
pub struct OpenGraph {
    properties: HashMap<String, String>,
    html_lang: Option<String>,
    canonical_link: Option<String>,
}

impl OpenGraph {
    pub fn parse(document: &Html) -> Self {
        let mut properties = HashMap::new();
        for meta in document.select(&META_PROPERTY) {
            let (Some(property), Some(content)) =
                (meta.value().attr("property"), meta.value().attr("content"))
            else {
                continue;
            };
            let property = property.trim().to_lowercase();
            let content = normalize_string(content);
            if property.starts_with("og:") && !content.is_empty() {
                // first tag wins
                properties.entry(property).or_insert(content);
            }
        }

        let html_lang = document
            .root_element()
            .value()
            .attr("lang")
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .map(str::to_string);

        let canonical_link = document
            .select(&CANONICAL_LINK)
            .find_map(|link| link.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(str::to_string);

        Self {
            properties,
            html_lang,
            canonical_link,
        }
    }

    fn property(&self, name: &str) -> Lookup<String> {
        self.properties.get(name).cloned().into()
    }

    pub fn site_name(&self) -> Lookup<String> {
        self.property("og:site_name")
            .or_fail(ExtractError::NotFoundInOpenGraph("site_name"))
    }

    pub fn image(&self) -> Lookup<String> {
        self.property("og:image")
            .or_fail(ExtractError::NotFoundInOpenGraph("image"))
    }

    pub fn title(&self) -> Lookup<String> {
        self.property("og:title")
    }

    pub fn description(&self) -> Lookup<String> {
        self.property("og:description")
    }

    pub fn url(&self) -> Lookup<String> {
        self.property("og:url")
    }

    pub fn kind(&self) -> Lookup<String> {
        self.property("og:type")
    }

    pub fn language(&self) -> Lookup<String> {
        self.html_lang.clone().into()
    }

    pub fn canonical_link(&self) -> Lookup<String> {
        self.canonical_link.clone().into()
    }
}
