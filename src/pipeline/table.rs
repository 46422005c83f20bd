use super::value::ValueKind;

/// Every field of a [`RecipeRecord`](crate::model::RecipeRecord) that is
/// resolved through the tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Ingredients,
    Instructions,
    TotalTime,
    CookTime,
    PrepTime,
    Yields,
    Servings,
    Image,
    Author,
    Description,
    Category,
    Cuisine,
    CookingMethod,
    Keywords,
    Rating,
    ReviewCount,
    Equipment,
    Nutrition,
    DietaryRestrictions,
    CanonicalUrl,
    SiteName,
    DatePublished,
    DateModified,
    Language,
    Host,
}

impl Field {
    /// The key used in serialised output and configuration.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Ingredients => "ingredients",
            Field::Instructions => "instructions",
            Field::TotalTime => "totalTime",
            Field::CookTime => "cookTime",
            Field::PrepTime => "prepTime",
            Field::Yields => "yields",
            Field::Servings => "servings",
            Field::Image => "image",
            Field::Author => "author",
            Field::Description => "description",
            Field::Category => "category",
            Field::Cuisine => "cuisine",
            Field::CookingMethod => "cookingMethod",
            Field::Keywords => "keywords",
            Field::Rating => "rating",
            Field::ReviewCount => "reviewCount",
            Field::Equipment => "equipment",
            Field::Nutrition => "nutrition",
            Field::DietaryRestrictions => "dietaryRestrictions",
            Field::CanonicalUrl => "canonicalUrl",
            Field::SiteName => "siteName",
            Field::DatePublished => "datePublished",
            Field::DateModified => "dateModified",
            Field::Language => "language",
            Field::Host => "host",
        }
    }

    /// Look a field up by key, ignoring case and underscores so that
    /// "totalTime", "total_time" and "TOTALTIME" all match.
    pub fn from_key(key: &str) -> Option<Field> {
        let wanted: String = key
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        FIELD_TABLE
            .iter()
            .map(|rule| rule.field)
            .find(|field| field.key().to_lowercase() == wanted)
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Field::Ingredients
            | Field::Keywords
            | Field::Equipment
            | Field::DietaryRestrictions => ValueKind::List,
            Field::TotalTime
            | Field::CookTime
            | Field::PrepTime
            | Field::Servings
            | Field::ReviewCount => ValueKind::Integer,
            Field::Rating => ValueKind::Decimal,
            Field::Nutrition => ValueKind::Nutrition,
            _ => ValueKind::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Exhausting every tier is an error
    Mandatory,
    /// Exhausting every tier leaves the field absent
    Optional,
}

/// A source a field value can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// The registered override for the page's host, if any
    SiteOverride,
    /// The merged schema.org Recipe entity
    StructuredData,
    /// `og:*` meta tags and other head metadata
    OpenGraph,
    /// The URL the page was fetched from
    SourceUrl,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub requirement: Requirement,
    /// Tried in order; the first `Found` wins
    pub tiers: &'static [Tier],
}

const SCHEMA: &[Tier] = &[Tier::SiteOverride, Tier::StructuredData];
const SCHEMA_THEN_OG: &[Tier] = &[Tier::SiteOverride, Tier::StructuredData, Tier::OpenGraph];
const CANONICAL: &[Tier] = &[
    Tier::SiteOverride,
    Tier::OpenGraph,
    Tier::StructuredData,
    Tier::SourceUrl,
];
const HOST: &[Tier] = &[Tier::SourceUrl];

const fn mandatory(field: Field, tiers: &'static [Tier]) -> FieldRule {
    FieldRule {
        field,
        requirement: Requirement::Mandatory,
        tiers,
    }
}

const fn optional(field: Field, tiers: &'static [Tier]) -> FieldRule {
    FieldRule {
        field,
        requirement: Requirement::Optional,
        tiers,
    }
}

/// Resolution order for every output field.
pub const FIELD_TABLE: &[FieldRule] = &[
    mandatory(Field::Title, SCHEMA_THEN_OG),
    mandatory(Field::Ingredients, SCHEMA),
    mandatory(Field::Instructions, SCHEMA),
    optional(Field::TotalTime, SCHEMA),
    optional(Field::CookTime, SCHEMA),
    optional(Field::PrepTime, SCHEMA),
    optional(Field::Yields, SCHEMA),
    optional(Field::Servings, SCHEMA),
    optional(Field::Image, SCHEMA_THEN_OG),
    optional(Field::Author, SCHEMA),
    optional(Field::Description, SCHEMA_THEN_OG),
    optional(Field::Category, SCHEMA),
    optional(Field::Cuisine, SCHEMA),
    optional(Field::CookingMethod, SCHEMA),
    optional(Field::Keywords, SCHEMA),
    optional(Field::Rating, SCHEMA),
    optional(Field::ReviewCount, SCHEMA),
    optional(Field::Equipment, SCHEMA),
    optional(Field::Nutrition, SCHEMA),
    optional(Field::DietaryRestrictions, SCHEMA),
    optional(Field::CanonicalUrl, CANONICAL),
    optional(Field::SiteName, SCHEMA_THEN_OG),
    optional(Field::DatePublished, SCHEMA),
    optional(Field::DateModified, SCHEMA),
    optional(Field::Language, SCHEMA_THEN_OG),
    optional(Field::Host, HOST),
];
