//! Table-driven field resolution.
//!
//! Every output field has a [`FieldRule`] listing the tiers to consult in
//! order. The first tier to produce a value of the right kind wins; a tier
//! that fails only costs a debug log line.

mod table;
mod value;

pub use table::{Field, FieldRule, Requirement, Tier, FIELD_TABLE};
pub use value::{FieldValue, ValueKind};

use crate::error::{ExtractError, ScrapeError};
use crate::extractors::{OpenGraph, ParsingContext, StructuredDataDocument};
use crate::lookup::Lookup;
use crate::model::RecipeRecord;
use crate::parsers::text::resolve_http_url;
use crate::sites::{host_name, SiteOverride};
use log::debug;

pub struct ExtractionPipeline<'a> {
    context: &'a ParsingContext,
    structured: StructuredDataDocument,
    opengraph: OpenGraph,
    site: Option<&'a dyn SiteOverride>,
    opengraph_fallback: bool,
}

impl<'a> ExtractionPipeline<'a> {
    pub fn new(
        context: &'a ParsingContext,
        structured: StructuredDataDocument,
        site: Option<&'a dyn SiteOverride>,
    ) -> Self {
        Self {
            context,
            opengraph: OpenGraph::parse(&context.document),
            structured,
            site,
            opengraph_fallback: true,
        }
    }

    /// Disable (or re-enable) the OpenGraph tier for every field.
    pub fn with_opengraph_fallback(mut self, enabled: bool) -> Self {
        self.opengraph_fallback = enabled;
        self
    }

    pub fn run(&self) -> Result<RecipeRecord, ScrapeError> {
        self.run_table(FIELD_TABLE)
    }

    pub fn run_table(&self, rules: &[FieldRule]) -> Result<RecipeRecord, ScrapeError> {
        let mut record = RecipeRecord::default();
        for rule in rules {
            match self.resolve(rule) {
                Some(value) => {
                    // resolve() has already checked the kind
                    if let Err(err) = record.apply(rule.field, value) {
                        debug!("Dropping {}: {}", rule.field.key(), err);
                    }
                }
                None if rule.requirement == Requirement::Mandatory => {
                    return Err(ScrapeError::RequiredFieldMissing(rule.field.key()));
                }
                None => {}
            }
        }
        Ok(record)
    }

    /// Walk the tiers of one rule. `None` once every tier is exhausted.
    pub fn resolve(&self, rule: &FieldRule) -> Option<FieldValue> {
        let field = rule.field;
        for tier in rule.tiers {
            if *tier == Tier::OpenGraph && !self.opengraph_fallback {
                continue;
            }
            match self.lookup(*tier, field) {
                Lookup::Found(value) if value.kind() == field.kind() => return Some(value),
                Lookup::Found(value) => debug!(
                    "{:?} gave {} for {}, expected {}",
                    tier,
                    value.kind().name(),
                    field.key(),
                    field.kind().name()
                ),
                Lookup::NotFound => match miss(*tier, field) {
                    Some(err) => debug!("{:?} miss: {}", tier, err),
                    None => debug!("{:?} has no value for {}", tier, field.key()),
                },
                Lookup::Failed(err) => debug!("{:?} failed for {}: {}", tier, field.key(), err),
            }
        }
        None
    }

    fn lookup(&self, tier: Tier, field: Field) -> Lookup<FieldValue> {
        match tier {
            Tier::SiteOverride => match self.site {
                Some(site) => site.extract(field, self.context),
                None => Lookup::NotFound,
            },
            Tier::StructuredData => self.structured_lookup(field),
            Tier::OpenGraph => self.opengraph_lookup(field),
            Tier::SourceUrl => self.source_url_lookup(field),
        }
    }

    fn structured_lookup(&self, field: Field) -> Lookup<FieldValue> {
        use FieldValue as V;

        let sd = &self.structured;
        match field {
            Field::Title => sd.title().map(V::Text),
            Field::Ingredients => sd.ingredients().map(V::List),
            Field::Instructions => sd.instructions().map(V::Text),
            Field::TotalTime => sd.total_time().map(V::Integer),
            Field::CookTime => sd.cook_time().map(V::Integer),
            Field::PrepTime => sd.prep_time().map(V::Integer),
            Field::Yields => sd.yields().map(V::Text),
            Field::Servings => sd.servings().map(V::Integer),
            Field::Image => sd.image().map(V::Text),
            Field::Author => sd.author().map(V::Text),
            Field::Description => sd.description().map(V::Text),
            Field::Category => sd.category().map(V::Text),
            Field::Cuisine => sd.cuisine().map(V::Text),
            Field::CookingMethod => sd.cooking_method().map(V::Text),
            Field::Keywords => sd.keywords().map(V::List),
            Field::Rating => sd.rating().map(V::Decimal),
            Field::ReviewCount => sd.review_count().map(V::Integer),
            Field::Equipment => sd.equipment().map(V::List),
            Field::Nutrition => sd.nutrition().map(V::Nutrition),
            Field::DietaryRestrictions => sd.dietary_restrictions().map(V::List),
            Field::CanonicalUrl => sd.canonical_url().map(V::Text),
            Field::SiteName => sd.site_name().map(V::Text),
            Field::DatePublished => sd.date_published().map(V::Text),
            Field::DateModified => sd.date_modified().map(V::Text),
            Field::Language => sd.language().map(V::Text),
            Field::Host => Lookup::NotFound,
        }
    }

    fn opengraph_lookup(&self, field: Field) -> Lookup<FieldValue> {
        let og = &self.opengraph;
        let text = match field {
            Field::Title => og.title(),
            Field::Description => og.description(),
            Field::Image => og.image().and_then(|href| self.absolute(&href)),
            Field::SiteName => og.site_name(),
            Field::CanonicalUrl => og
                .canonical_link()
                .and_then(|href| self.absolute(&href))
                .or_else(|| og.url().and_then(|href| self.absolute(&href))),
            Field::Language => og.language(),
            _ => Lookup::NotFound,
        };
        text.map(FieldValue::Text)
    }

    /// Links in the page head may be relative to the page URL.
    fn absolute(&self, href: &str) -> Lookup<String> {
        resolve_http_url(&self.context.url, href).into()
    }

    fn source_url_lookup(&self, field: Field) -> Lookup<FieldValue> {
        let url = self.context.url.trim();
        match field {
            Field::CanonicalUrl if !url.is_empty() => Lookup::Found(FieldValue::Text(url.to_string())),
            Field::Host => host_name(url).map(FieldValue::Text).into(),
            _ => Lookup::NotFound,
        }
    }
}

fn miss(tier: Tier, field: Field) -> Option<ExtractError> {
    match tier {
        Tier::StructuredData => Some(ExtractError::NotFoundInStructuredData(field.key())),
        Tier::OpenGraph => Some(ExtractError::NotFoundInOpenGraph(field.key())),
        Tier::SiteOverride | Tier::SourceUrl => None,
    }
}
