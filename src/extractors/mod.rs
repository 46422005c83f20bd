use scraper::Html;

mod graph;
mod json_ld;
mod microdata;
mod opengraph;
mod structured_data;

pub use graph::EntityNode;
pub use json_ld::{decode_block, repair_json};
pub use microdata::microdata_items;
pub use opengraph::OpenGraph;
pub use structured_data::{ParseOptions, StructuredDataDocument};

/// A page being scraped: the source URL and its parsed HTML.
///
/// Built fresh for every scrape and never shared between scrapes.
pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(html: &str, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}
