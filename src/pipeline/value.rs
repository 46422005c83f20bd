use super::table::Field;
use crate::error::ExtractError;
use crate::model::{Nutrition, RecipeRecord};

/// A resolved value for one field, whichever tier produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Integer(u32),
    Decimal(f64),
    Nutrition(Nutrition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    List,
    Integer,
    Decimal,
    Nutrition,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::List => "list",
            ValueKind::Integer => "integer",
            ValueKind::Decimal => "decimal",
            ValueKind::Nutrition => "nutrition",
        }
    }
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::List(_) => ValueKind::List,
            FieldValue::Integer(_) => ValueKind::Integer,
            FieldValue::Decimal(_) => ValueKind::Decimal,
            FieldValue::Nutrition(_) => ValueKind::Nutrition,
        }
    }
}

impl RecipeRecord {
    /// Store a resolved value. Fails when the value kind does not match the
    /// field.
    pub fn apply(&mut self, field: Field, value: FieldValue) -> Result<(), ExtractError> {
        use FieldValue as V;

        match (field, value) {
            (Field::Title, V::Text(v)) => self.title = v,
            (Field::Ingredients, V::List(v)) => self.ingredients = v,
            (Field::Instructions, V::Text(v)) => {
                self.instructions_list = v
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect();
                self.instructions = self.instructions_list.join("\n");
            }
            (Field::TotalTime, V::Integer(v)) => self.total_time = Some(v),
            (Field::CookTime, V::Integer(v)) => self.cook_time = Some(v),
            (Field::PrepTime, V::Integer(v)) => self.prep_time = Some(v),
            (Field::Yields, V::Text(v)) => self.yields = Some(v),
            (Field::Servings, V::Integer(v)) => self.servings = Some(v),
            (Field::Image, V::Text(v)) => self.image = Some(v),
            (Field::Author, V::Text(v)) => self.author = Some(v),
            (Field::Description, V::Text(v)) => self.description = Some(v),
            (Field::Category, V::Text(v)) => self.category = Some(v),
            (Field::Cuisine, V::Text(v)) => self.cuisine = Some(v),
            (Field::CookingMethod, V::Text(v)) => self.cooking_method = Some(v),
            (Field::Keywords, V::List(v)) => self.keywords = Some(v),
            (Field::Rating, V::Decimal(v)) => self.rating = Some(v),
            (Field::ReviewCount, V::Integer(v)) => self.review_count = Some(v),
            (Field::Equipment, V::List(v)) => self.equipment = Some(v),
            (Field::Nutrition, V::Nutrition(v)) => self.nutrition = Some(v),
            (Field::DietaryRestrictions, V::List(v)) => self.dietary_restrictions = Some(v),
            (Field::CanonicalUrl, V::Text(v)) => self.canonical_url = Some(v),
            (Field::SiteName, V::Text(v)) => self.site_name = Some(v),
            (Field::DatePublished, V::Text(v)) => self.date_published = Some(v),
            (Field::DateModified, V::Text(v)) => self.date_modified = Some(v),
            (Field::Language, V::Text(v)) => self.language = Some(v),
            (Field::Host, V::Text(v)) => self.host = Some(v),
            (field, _) => {
                return Err(ExtractError::UnexpectedShape {
                    field: field.key(),
                    expected: field.kind().name(),
                })
            }
        }
        Ok(())
    }
}
