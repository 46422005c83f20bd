use log::debug;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Nesting deeper than this is not walked.
const MAX_DEPTH: usize = 32;

/// A JSON-LD object viewed as a schema.org entity.
#[derive(Debug)]
pub struct EntityNode<'a> {
    object: &'a Map<String, Value>,
    types: Vec<String>,
}

impl<'a> EntityNode<'a> {
    pub fn new(object: &'a Map<String, Value>) -> Self {
        let types = match object.get("@type") {
            Some(Value::String(t)) => vec![t.to_lowercase()],
            Some(Value::Array(ts)) => ts
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_lowercase)
                .collect(),
            _ => Vec::new(),
        };
        Self { object, types }
    }

    /// Lower-cased `@type` values.
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Identity key: `@id`, else `url`.
    pub fn id(&self) -> Option<&'a str> {
        self.object
            .get("@id")
            .or_else(|| self.object.get("url"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Case-insensitive substring match against the type set, so
    /// "schema:Recipe" or "Recipes" still count as a recipe.
    pub fn is_type(&self, schema_type: &str) -> bool {
        let needle = schema_type.to_lowercase();
        self.types.iter().any(|t| t.contains(&needle))
    }
}

/// Everything collected while walking a page's structured data payloads.
#[derive(Debug, Default)]
pub(crate) struct EntityGraph {
    pub recipe: Map<String, Value>,
    pub recipe_nodes: usize,
    pub people: HashMap<String, Map<String, Value>>,
    pub ratings: HashMap<String, Map<String, Value>>,
    pub website_name: Option<String>,
}

fn merge_into(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        target.insert(key.clone(), value.clone());
    }
}

impl EntityGraph {
    /// Walk one decoded payload. Payloads must be added in document order:
    /// later Recipe properties overwrite earlier ones key by key.
    pub fn add(&mut self, payload: &Value) {
        self.walk(payload, 0);
    }

    fn walk(&mut self, value: &Value, depth: usize) {
        if depth > MAX_DEPTH {
            debug!("Structured data nested deeper than {}, not walking", MAX_DEPTH);
            return;
        }
        match value {
            Value::Array(items) => {
                for item in items {
                    self.walk(item, depth + 1);
                }
            }
            Value::Object(object) => self.visit(object, depth),
            _ => {}
        }
    }

    fn visit(&mut self, object: &Map<String, Value>, depth: usize) {
        if let Some(graph) = object.get("@graph") {
            self.walk(graph, depth + 1);
        }

        let node = EntityNode::new(object);

        if node.is_type("website") && self.website_name.is_none() {
            self.website_name = object
                .get("name")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string);
        }

        if node.is_type("person") {
            if let Some(id) = node.id() {
                merge_into(self.people.entry(id.to_string()).or_default(), object);
            }
        }

        if node.is_type("aggregaterating") {
            if let Some(id) = node.id() {
                merge_into(self.ratings.entry(id.to_string()).or_default(), object);
            }
        }

        if node.is_type("recipe") {
            debug!("Found Recipe node with types {:?}", node.types());
            merge_into(&mut self.recipe, object);
            self.recipe_nodes += 1;
        } else if node.is_type("webpage") {
            if let Some(main_entity) = object.get("mainEntity") {
                self.walk(main_entity, depth + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_node_types() {
        let value = json!({"@type": ["Recipe", "schema:NewsArticle"], "@id": "#r"});
        let node = EntityNode::new(value.as_object().unwrap());
        assert!(node.is_type("Recipe"));
        assert!(node.is_type("newsarticle"));
        assert!(!node.is_type("Person"));
        assert_eq!(node.id(), Some("#r"));
    }

    #[test]
    fn test_entity_node_falls_back_to_url_identity() {
        let value = json!({"@type": "Person", "url": "https://example.com/jane"});
        let node = EntityNode::new(value.as_object().unwrap());
        assert_eq!(node.id(), Some("https://example.com/jane"));
    }

    #[test]
    fn test_graph_walk_collects_entities() {
        let payload = json!({
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "WebSite", "name": "Tea Times"},
                {"@type": "WebSite", "name": "Ignored"},
                {"@type": "Person", "@id": "#p1", "name": "Jane"},
                {"@type": "AggregateRating", "@id": "#r1", "ratingValue": "4.5"},
                {"@type": "WebPage", "mainEntity": {"@type": "Recipe", "name": "Tea"}}
            ]
        });
        let mut graph = EntityGraph::default();
        graph.add(&payload);

        assert_eq!(graph.website_name.as_deref(), Some("Tea Times"));
        assert_eq!(graph.people["#p1"]["name"], "Jane");
        assert_eq!(graph.ratings["#r1"]["ratingValue"], "4.5");
        assert_eq!(graph.recipe["name"], "Tea");
        assert_eq!(graph.recipe_nodes, 1);
    }

    #[test]
    fn test_later_recipe_properties_override() {
        let mut graph = EntityGraph::default();
        graph.add(&json!({"@type": "Recipe", "name": "First", "recipeYield": "2"}));
        graph.add(&json!([{"@type": "recipe", "name": "Second"}]));

        assert_eq!(graph.recipe["name"], "Second");
        assert_eq!(graph.recipe["recipeYield"], "2");
        assert_eq!(graph.recipe_nodes, 2);
    }
}
