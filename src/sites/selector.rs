use super::SiteOverride;
use crate::error::{ExtractError, ScrapeError};
use crate::extractors::ParsingContext;
use crate::lookup::Lookup;
use crate::parsers::text::normalize_string;
use crate::parsers::{parse_minutes, parse_yield};
use crate::pipeline::{Field, FieldValue, ValueKind};
use scraper::{ElementRef, Selector};
use std::collections::HashMap;

/// A site override driven by one CSS selector per field.
pub struct SelectorOverride {
    host: String,
    selectors: HashMap<Field, Selector>,
}

impl SelectorOverride {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            selectors: HashMap::new(),
        }
    }

    pub fn with_selector(mut self, field: Field, css: &str) -> Result<Self, ScrapeError> {
        let selector = Selector::parse(css).map_err(|e| ScrapeError::InvalidSelector {
            selector: css.to_string(),
            reason: e.to_string(),
        })?;
        self.selectors.insert(field, selector);
        Ok(self)
    }

    /// Build from a `field key -> CSS selector` table.
    pub fn from_selectors(
        host: &str,
        selectors: &HashMap<String, String>,
    ) -> Result<Self, ScrapeError> {
        let mut site = Self::new(host);
        let mut selectors: Vec<_> = selectors.iter().collect();
        selectors.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for (key, css) in selectors {
            let field = Field::from_key(key).ok_or_else(|| ScrapeError::UnknownField(key.clone()))?;
            site = site.with_selector(field, css)?;
        }
        Ok(site)
    }
}

fn element_text(element: &ElementRef) -> String {
    if let Some(content) = element.value().attr("content") {
        return normalize_string(content);
    }
    normalize_string(&element.text().collect::<Vec<_>>().join(" "))
}

fn element_image(element: &ElementRef) -> Option<String> {
    ["src", "data-src", "content", "href"]
        .iter()
        .find_map(|attr| element.value().attr(attr))
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

fn number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    cleaned.replace(',', ".").parse().ok()
}

impl SiteOverride for SelectorOverride {
    fn host(&self) -> &str {
        &self.host
    }

    fn extract(&self, field: Field, context: &ParsingContext) -> Lookup<FieldValue> {
        let Some(selector) = self.selectors.get(&field) else {
            return Lookup::NotFound;
        };
        let elements: Vec<ElementRef> = context.document.select(selector).collect();
        let texts: Vec<String> = elements
            .iter()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();

        if field.kind() == ValueKind::List {
            return if texts.is_empty() {
                Lookup::NotFound
            } else {
                Lookup::Found(FieldValue::List(texts))
            };
        }

        if field == Field::Image {
            return elements.iter().find_map(element_image).map(FieldValue::Text).into();
        }

        if field == Field::Instructions {
            return if texts.is_empty() {
                Lookup::NotFound
            } else {
                Lookup::Found(FieldValue::Text(texts.join("\n")))
            };
        }

        let Some(text) = texts.into_iter().next() else {
            return Lookup::NotFound;
        };

        match field {
            Field::TotalTime | Field::CookTime | Field::PrepTime => {
                parse_minutes(&text).map(FieldValue::Integer)
            }
            Field::Yields => parse_yield(&text).map(|y| FieldValue::Text(y.to_string())),
            Field::Servings => parse_yield(&text).and_then(|y| match y.quantity {
                0 => Lookup::NotFound,
                quantity => Lookup::Found(FieldValue::Integer(quantity)),
            }),
            Field::Rating => match number(&text) {
                Some(rating) => Lookup::Found(FieldValue::Decimal((rating * 100.0).round() / 100.0)),
                None => Lookup::NotFound,
            },
            Field::ReviewCount => match number(&text).map(|count| count as u32) {
                Some(count) if count > 0 => Lookup::Found(FieldValue::Integer(count)),
                _ => Lookup::NotFound,
            },
            Field::Nutrition => Lookup::Failed(ExtractError::UnexpectedShape {
                field: field.key(),
                expected: "nutrition facts, not a selector",
            }),
            _ => Lookup::Found(FieldValue::Text(text)),
        }
    }
}
