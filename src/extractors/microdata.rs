use crate::parsers::text::normalize_string;
use log::debug;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};

static ITEMSCOPE: Lazy<Selector> = Lazy::new(|| Selector::parse("[itemscope]").unwrap());

/// Convert every top-level microdata item into a JSON-LD shaped object so it
/// can be walked like any other structured data payload.
pub fn microdata_items(document: &Html) -> Vec<Value> {
    let items: Vec<Value> = document
        .select(&ITEMSCOPE)
        .filter(|element| element.value().attr("itemprop").is_none())
        .map(|element| Value::Object(item_object(element)))
        .collect();
    debug!("Found {} top-level microdata items", items.len());
    items
}

fn item_types(itemtype: &str) -> Value {
    let types: Vec<Value> = itemtype
        .split_whitespace()
        .filter_map(|url| url.trim_end_matches('/').rsplit('/').next())
        .filter(|name| !name.is_empty())
        .map(|name| Value::String(name.to_string()))
        .collect();
    match types.len() {
        0 => Value::Null,
        1 => types.into_iter().next().unwrap_or(Value::Null),
        _ => Value::Array(types),
    }
}

fn item_object(scope: ElementRef) -> Map<String, Value> {
    let mut item = Map::new();
    if let Some(itemtype) = scope.value().attr("itemtype") {
        let types = item_types(itemtype);
        if !types.is_null() {
            item.insert("@type".to_string(), types);
        }
    }
    if let Some(id) = scope.value().attr("itemid") {
        item.insert("@id".to_string(), Value::String(id.to_string()));
    }
    collect_properties(scope, &mut item);
    item
}

fn collect_properties(parent: ElementRef, item: &mut Map<String, Value>) {
    for child in parent.children().filter_map(ElementRef::wrap) {
        let is_scope = child.value().attr("itemscope").is_some();
        if let Some(names) = child.value().attr("itemprop") {
            let value = if is_scope {
                Value::Object(item_object(child))
            } else {
                Value::String(property_value(child))
            };
            for name in names.split_whitespace() {
                push_property(item, name, value.clone());
            }
        }
        // nested items own their descendants
        if !is_scope {
            collect_properties(child, item);
        }
    }
}

/// Repeated properties turn into arrays in document order.
fn push_property(item: &mut Map<String, Value>, name: &str, value: Value) {
    match item.get_mut(name) {
        Some(Value::Array(values)) => values.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            item.insert(name.to_string(), value);
        }
    }
}

fn property_value(element: ElementRef) -> String {
    let el = element.value();
    let attr = match el.name() {
        "meta" => el.attr("content"),
        "img" | "audio" | "video" | "source" | "embed" | "iframe" | "track" => el.attr("src"),
        "a" | "link" | "area" => el.attr("href"),
        "object" => el.attr("data"),
        "time" => el.attr("datetime"),
        "data" | "meter" => el.attr("value"),
        _ => el.attr("content"),
    };
    match attr {
        Some(value) => value.trim().to_string(),
        None => normalize_string(&element.text().collect::<Vec<_>>().join(" ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recipe_item_with_nested_author() {
        let html = r#"
            <html><body>
            <div itemscope itemtype="http://schema.org/Recipe">
                <h1 itemprop="name">Pancakes</h1>
                <img itemprop="image" src="https://example.com/pancakes.jpg">
                <meta itemprop="totalTime" content="PT20M">
                <span itemprop="recipeYield">Serves 4</span>
                <div itemprop="author" itemscope itemtype="http://schema.org/Person">
                    <span itemprop="name">Jane Doe</span>
                </div>
                <ul>
                    <li itemprop="recipeIngredient">1 cup flour</li>
                    <li itemprop="recipeIngredient">2   eggs</li>
                </ul>
                <time itemprop="datePublished" datetime="2024-01-02">Jan 2</time>
            </div>
            </body></html>
        "#;
        let document = Html::parse_document(html);
        let items = microdata_items(&document);

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item["@type"], "Recipe");
        assert_eq!(item["name"], "Pancakes");
        assert_eq!(item["image"], "https://example.com/pancakes.jpg");
        assert_eq!(item["totalTime"], "PT20M");
        assert_eq!(item["recipeYield"], "Serves 4");
        assert_eq!(item["author"], json!({"@type": "Person", "name": "Jane Doe"}));
        assert_eq!(item["recipeIngredient"], json!(["1 cup flour", "2 eggs"]));
        assert_eq!(item["datePublished"], "2024-01-02");
    }

    #[test]
    fn test_no_items() {
        let document = Html::parse_document("<html><body><p>Nothing</p></body></html>");
        assert!(microdata_items(&document).is_empty());
    }
}
