use super::graph::{EntityGraph, EntityNode};
use super::json_ld::{decode_block, script_blocks};
use super::microdata::microdata_items;
use super::ParsingContext;
use crate::error::ExtractError;
use crate::lookup::Lookup;
use crate::model::Nutrition;
use crate::parsers::text::{
    csv_to_tags, decode_html_symbols, dedup_preserving_order, is_absolute_http_url,
    normalize_string,
};
use crate::parsers::{parse_minutes, parse_yield, Yield};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::collections::HashMap;

const TIME_KEYS: [&str; 3] = ["totalTime", "prepTime", "cookTime"];

/// schema.org `RestrictedDiet` members and their display names.
const DIET_NAMES: &[(&str, &str)] = &[
    ("Diabetic", "Diabetic Diet"),
    ("GlutenFree", "Gluten Free Diet"),
    ("Halal", "Halal Diet"),
    ("Hindu", "Hindu Diet"),
    ("Kosher", "Kosher Diet"),
    ("LowCalorie", "Low Calorie Diet"),
    ("LowFat", "Low Fat Diet"),
    ("LowLactose", "Low Lactose Diet"),
    ("LowSalt", "Low Salt Diet"),
    ("Vegan", "Vegan Diet"),
    ("Vegetarian", "Vegetarian Diet"),
];

/// Which structured data syntaxes to read, and how forgiving to be.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    pub repair_json: bool,
    pub microdata: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            repair_json: true,
            microdata: true,
        }
    }
}

/// The schema.org view of one page: the merged Recipe entity plus the
/// Person and AggregateRating indexes used to dereference `@id` links.
///
/// Immutable once parsed.
#[derive(Debug, Default)]
pub struct StructuredDataDocument {
    recipe: Map<String, Value>,
    recipe_nodes: usize,
    people: HashMap<String, Map<String, Value>>,
    ratings: HashMap<String, Map<String, Value>>,
    website_name: Option<String>,
}

impl StructuredDataDocument {
    /// Parse every JSON-LD block (and microdata item) on the page.
    /// A block that cannot be decoded is logged and skipped.
    pub fn parse(context: &ParsingContext, options: &ParseOptions) -> Self {
        debug!("Parsing structured data for URL: {}", context.url);
        let mut graph = EntityGraph::default();

        for (index, raw) in script_blocks(&context.document).iter().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            match decode_block(index, raw, options.repair_json) {
                Ok(payload) => graph.add(&payload),
                Err(err) => warn!("Skipping JSON-LD block: {}", err),
            }
        }

        if options.microdata {
            for item in microdata_items(&context.document) {
                graph.add(&item);
            }
        }

        Self::from_graph(graph)
    }

    /// Build a document straight from already decoded payloads, in order.
    pub fn from_payloads(payloads: &[Value]) -> Self {
        let mut graph = EntityGraph::default();
        for payload in payloads {
            graph.add(payload);
        }
        Self::from_graph(graph)
    }

    fn from_graph(graph: EntityGraph) -> Self {
        debug!(
            "Structured data: {} recipe node(s), {} people, {} ratings",
            graph.recipe_nodes,
            graph.people.len(),
            graph.ratings.len()
        );
        Self {
            recipe: graph.recipe,
            recipe_nodes: graph.recipe_nodes,
            people: graph.people,
            ratings: graph.ratings,
            website_name: graph.website_name,
        }
    }

    pub fn has_recipe(&self) -> bool {
        self.recipe_nodes > 0
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.recipe.get(key).filter(|value| !value.is_null())
    }

    /// Follow an `{"@id": ...}` reference into an index; anything else is
    /// returned unchanged.
    fn resolve<'a>(
        &'a self,
        value: &'a Value,
        index: &'a HashMap<String, Map<String, Value>>,
    ) -> ResolvedValue<'a> {
        if let Value::Object(object) = value {
            if let Some(target) = EntityNode::new(object).id().and_then(|id| index.get(id)) {
                return ResolvedValue::Entity(target);
            }
        }
        ResolvedValue::Value(value)
    }

    pub fn title(&self) -> Lookup<String> {
        self.get("name").and_then(value_text).into()
    }

    pub fn description(&self) -> Lookup<String> {
        self.get("description").and_then(value_text).into()
    }

    pub fn ingredients(&self) -> Lookup<Vec<String>> {
        let Some(value) = self.get("recipeIngredient").or_else(|| self.get("ingredients")) else {
            return Lookup::NotFound;
        };
        let mut ingredients = Vec::new();
        collect_ingredients(value, &mut ingredients, 0);
        non_empty(ingredients)
    }

    /// Instruction lines in source order, with HowToSection names kept as
    /// their own lines.
    pub fn instructions_list(&self) -> Lookup<Vec<String>> {
        let Some(value) = self.get("recipeInstructions") else {
            return Lookup::NotFound;
        };
        non_empty(extract_howto_instructions(value))
    }

    pub fn instructions(&self) -> Lookup<String> {
        self.instructions_list().map(|lines| lines.join("\n"))
    }

    fn has_time_info(&self) -> bool {
        TIME_KEYS.iter().any(|key| self.recipe.contains_key(*key))
    }

    fn minutes_for(&self, key: &'static str) -> Lookup<u32> {
        let Some(value) = self.get(key) else {
            return Lookup::NotFound;
        };
        let value = match value {
            Value::Object(object) if object.contains_key("maxValue") => &object["maxValue"],
            other => other,
        };
        let minutes = match value {
            Value::String(text) => parse_minutes(text),
            Value::Number(n) => match n.as_f64().map(f64::round) {
                Some(m) if m > f64::from(u32::MAX) => {
                    Lookup::Failed(ExtractError::InvalidDurationText(n.to_string()))
                }
                Some(m) if m > 0.0 => Lookup::Found(m as u32),
                _ => Lookup::NotFound,
            },
            _ => Lookup::Failed(ExtractError::UnexpectedShape {
                field: key,
                expected: "duration text",
            }),
        };
        match minutes {
            Lookup::Failed(err) => {
                debug!("{} present but unusable: {}", key, err);
                Lookup::NotFound
            }
            other => other,
        }
    }

    /// `totalTime`, or the sum of `prepTime` and `cookTime` when it is
    /// missing or unusable.
    pub fn total_time(&self) -> Lookup<u32> {
        if !self.has_time_info() {
            return Lookup::Failed(ExtractError::NoTimeInfo);
        }
        self.minutes_for("totalTime").or_else(|| {
            let prep = self.minutes_for("prepTime").found();
            let cook = self.minutes_for("cookTime").found();
            match (prep, cook) {
                (None, None) => Lookup::NotFound,
                (prep, cook) => match prep.unwrap_or(0).checked_add(cook.unwrap_or(0)) {
                    Some(total) => Lookup::Found(total),
                    None => {
                        debug!("prepTime + cookTime overflows, no total time");
                        Lookup::NotFound
                    }
                },
            }
        })
    }

    pub fn cook_time(&self) -> Lookup<u32> {
        if !self.has_time_info() {
            return Lookup::Failed(ExtractError::NoTimeInfo);
        }
        self.minutes_for("cookTime")
    }

    pub fn prep_time(&self) -> Lookup<u32> {
        if !self.has_time_info() {
            return Lookup::Failed(ExtractError::NoTimeInfo);
        }
        self.minutes_for("prepTime")
    }

    fn classified_yield(&self) -> Lookup<Yield> {
        let Some(mut value) = self.get("recipeYield").or_else(|| self.get("yield")) else {
            return Lookup::NotFound;
        };
        if let Value::Array(items) = value {
            match items.first() {
                Some(first) => value = first,
                None => return Lookup::NotFound,
            }
        }
        match value {
            Value::String(text) => parse_yield(&normalize_string(text)),
            Value::Number(n) => parse_yield(&n.to_string()),
            other => Lookup::Failed(ExtractError::InvalidYieldText(other.to_string())),
        }
    }

    pub fn yields(&self) -> Lookup<String> {
        self.classified_yield().map(|y| y.to_string())
    }

    pub fn servings(&self) -> Lookup<u32> {
        self.classified_yield().and_then(|y| match y.quantity {
            0 => Lookup::NotFound,
            quantity => Lookup::Found(quantity),
        })
    }

    pub fn image(&self) -> Lookup<String> {
        self.get("image")
            .and_then(|value| image_url(value, 0))
            .filter(|url| is_absolute_http_url(url))
            .into()
    }

    pub fn author(&self) -> Lookup<String> {
        let Some(mut value) = self.get("author").or_else(|| self.get("Author")) else {
            return Lookup::NotFound;
        };
        if let Value::Array(authors) = value {
            match authors.first() {
                Some(first) => value = first,
                None => return Lookup::NotFound,
            }
        }
        match self.resolve(value, &self.people) {
            ResolvedValue::Entity(person) => person.get("name").and_then(value_text).into(),
            ResolvedValue::Value(Value::Object(author)) => {
                author.get("name").and_then(value_text).into()
            }
            ResolvedValue::Value(other) => value_text(other).into(),
        }
    }

    pub fn category(&self) -> Lookup<String> {
        self.get("recipeCategory").and_then(joined_text).into()
    }

    pub fn cuisine(&self) -> Lookup<String> {
        self.get("recipeCuisine").and_then(joined_text).into()
    }

    pub fn cooking_method(&self) -> Lookup<String> {
        self.get("cookingMethod").and_then(value_text).into()
    }

    pub fn keywords(&self) -> Lookup<Vec<String>> {
        let Some(text) = self.get("keywords").and_then(joined_text) else {
            return Lookup::NotFound;
        };
        non_empty(csv_to_tags(&text))
    }

    pub fn dietary_restrictions(&self) -> Lookup<Vec<String>> {
        let diets: Vec<String> = match self.get("suitableForDiet") {
            Some(Value::String(diet)) => vec![format_diet_name(diet)],
            Some(Value::Array(diets)) => diets
                .iter()
                .filter_map(Value::as_str)
                .map(format_diet_name)
                .collect(),
            _ => return Lookup::NotFound,
        };
        non_empty(csv_to_tags(&diets.join(", ")))
    }

    fn aggregate_rating(&self) -> Option<&Map<String, Value>> {
        match self.resolve(self.get("aggregateRating")?, &self.ratings) {
            ResolvedValue::Entity(rating) => Some(rating),
            ResolvedValue::Value(Value::Object(rating)) => Some(rating),
            ResolvedValue::Value(_) => None,
        }
    }

    /// `ratingValue` rounded to two decimals. A bare `aggregateRating`
    /// string or number is read as the rating value itself.
    pub fn rating(&self) -> Lookup<f64> {
        let value = match self.get("aggregateRating") {
            Some(bare @ (Value::String(_) | Value::Number(_))) => bare,
            _ => {
                let Some(rating) = self.aggregate_rating() else {
                    return Lookup::NotFound;
                };
                let Some(value) = rating.get("ratingValue").filter(|v| !v.is_null()) else {
                    return Lookup::NotFound;
                };
                value
            }
        };
        match number_value(value) {
            Some(value) => Lookup::Found((value * 100.0).round() / 100.0),
            None => Lookup::Failed(ExtractError::UnexpectedShape {
                field: "ratingValue",
                expected: "number",
            }),
        }
    }

    /// `ratingCount`, else `reviewCount`. A count of zero is not a count.
    pub fn review_count(&self) -> Lookup<u32> {
        let Some(rating) = self.aggregate_rating() else {
            return Lookup::NotFound;
        };
        let count = ["ratingCount", "reviewCount"]
            .iter()
            .filter_map(|key| rating.get(*key))
            .filter_map(number_value)
            .find(|count| *count >= 1.0);
        match count {
            Some(count) => Lookup::Found(count as u32),
            None => Lookup::NotFound,
        }
    }

    pub fn equipment(&self) -> Lookup<Vec<String>> {
        let tools: Vec<String> = match self.get("tool") {
            Some(Value::Array(tools)) => tools.iter().filter_map(value_text).collect(),
            Some(tool) => value_text(tool).into_iter().collect(),
            None => return Lookup::NotFound,
        };
        non_empty(dedup_preserving_order(tools))
    }

    pub fn nutrition(&self) -> Lookup<Nutrition> {
        let Some(Value::Object(facts)) = self.get("nutrition") else {
            return Lookup::NotFound;
        };
        let mut nutrition = Nutrition::default();
        for (key, value) in facts {
            if key.starts_with('@') {
                continue;
            }
            if let (Some(slot), Some(text)) = (nutrition.slot_mut(key), value_text(value)) {
                *slot = Some(text);
            }
        }
        if nutrition.is_empty() {
            Lookup::NotFound
        } else {
            Lookup::Found(nutrition)
        }
    }

    pub fn date_published(&self) -> Lookup<String> {
        self.get("datePublished").and_then(value_text).into()
    }

    pub fn date_modified(&self) -> Lookup<String> {
        self.get("dateModified").and_then(value_text).into()
    }

    pub fn language(&self) -> Lookup<String> {
        self.get("inLanguage").and_then(value_text).into()
    }

    pub fn canonical_url(&self) -> Lookup<String> {
        self.get("url")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| is_absolute_http_url(url))
            .map(str::to_string)
            .into()
    }

    pub fn site_name(&self) -> Lookup<String> {
        self.website_name.clone().into()
    }
}

enum ResolvedValue<'a> {
    Entity(&'a Map<String, Value>),
    Value(&'a Value),
}

fn non_empty<T>(items: Vec<T>) -> Lookup<Vec<T>> {
    if items.is_empty() {
        Lookup::NotFound
    } else {
        Lookup::Found(items)
    }
}

/// Normalised text of a scalar, the first element of an array, or the
/// `name`/`text`/`@value` of an object.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(normalize_string(text)).filter(|t| !t.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.first().and_then(value_text),
        Value::Object(object) => ["name", "text", "@value"]
            .iter()
            .find_map(|key| object.get(*key))
            .and_then(value_text),
        Value::Null | Value::Bool(_) => None,
    }
}

/// Like [`value_text`], but every element of an array is kept, joined by
/// ", ".
fn joined_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_text).collect();
            Some(parts.join(", ")).filter(|t| !t.is_empty())
        }
        other => value_text(other),
    }
}

fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

fn image_url(value: &Value, depth: usize) -> Option<String> {
    if depth > 4 {
        return None;
    }
    match value {
        Value::String(url) => Some(decode_html_symbols(url.trim())),
        Value::Array(images) => images.first().and_then(|first| image_url(first, depth + 1)),
        Value::Object(object) => object
            .get("url")
            .or_else(|| object.get("contentUrl"))
            .and_then(|url| image_url(url, depth + 1)),
        _ => None,
    }
}

fn collect_ingredients(value: &Value, ingredients: &mut Vec<String>, depth: usize) {
    if depth > 4 {
        return;
    }
    match value {
        Value::String(text) => ingredients.extend(
            text.lines()
                .map(normalize_string)
                .filter(|line| !line.is_empty()),
        ),
        Value::Array(items) => {
            for item in items {
                collect_ingredients(item, ingredients, depth + 1);
            }
        }
        Value::Object(object) => {
            let Some(name) = ["name", "text"]
                .iter()
                .find_map(|key| object.get(*key))
                .and_then(value_text)
            else {
                return;
            };
            match object.get("amount").and_then(value_text) {
                Some(amount) => ingredients.push(format!("{amount} {name}")),
                None => ingredients.push(name),
            }
        }
        _ => {}
    }
}

/// Flatten `recipeInstructions` into ordered lines.
///
/// Handles bare strings, HowToStep (its `name` is kept only when it is not
/// a prefix of its `text`), HowToSection (its `name`, then its
/// `itemListElement`), plain lists and ItemLists.
pub fn extract_howto_instructions(value: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    flatten_instructions(value, &mut lines, 0);
    lines
}

fn flatten_instructions(value: &Value, lines: &mut Vec<String>, depth: usize) {
    if depth > 8 {
        return;
    }
    match value {
        Value::String(text) => lines.extend(
            text.lines()
                .map(normalize_string)
                .filter(|line| !line.is_empty()),
        ),
        Value::Array(items) => {
            for item in items {
                flatten_instructions(item, lines, depth + 1);
            }
        }
        Value::Object(object) => {
            let node = EntityNode::new(object);
            let name = object.get("name").and_then(value_text);
            let text = object.get("text").and_then(value_text);

            if node.is_type("howtosection") {
                lines.extend(name);
                if let Some(items) = object.get("itemListElement") {
                    flatten_instructions(items, lines, depth + 1);
                }
                return;
            }

            match text {
                Some(text) => {
                    if let Some(name) = name.filter(|_| node.is_type("howtostep")) {
                        if !text.starts_with(name.trim_end_matches('.')) {
                            lines.push(name);
                        }
                    }
                    lines.push(text);
                }
                None => match object.get("itemListElement") {
                    Some(items) => flatten_instructions(items, lines, depth + 1),
                    None => lines.extend(name.filter(|_| node.is_type("howtostep"))),
                },
            }
        }
        _ => {}
    }
}

fn format_diet_name(diet: &str) -> String {
    let diet = diet.trim();
    let name = diet.rsplit("schema.org/").next().unwrap_or(diet);
    DIET_NAMES
        .iter()
        .find(|(key, _)| name.starts_with(key))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| name.to_string())
}
