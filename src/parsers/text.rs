use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

pub fn decode_html_symbols(text: &str) -> String {
    // some sites escape their payloads twice
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

/// Decode entities, fold every whitespace run (including NBSP) into one
/// space and trim.
pub fn normalize_string(text: &str) -> String {
    let decoded = decode_html_symbols(text).replace('\u{a0}', " ");
    WHITESPACE.replace_all(decoded.trim(), " ").into_owned()
}

/// Split comma separated text into tags, dropping empty entries and later
/// case-insensitive duplicates.
pub fn csv_to_tags(csv: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for raw in csv.split(',') {
        let tag = raw.trim();
        if !tag.is_empty() && seen.insert(tag.to_lowercase()) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Order preserving de-duplication of exact matches.
pub fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

pub fn is_absolute_http_url(text: &str) -> bool {
    text.starts_with("http://") || text.starts_with("https://")
}

/// Resolve `href` against the page URL. Only http(s) results are kept.
pub fn resolve_http_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    let resolved = match Url::parse(base.trim()) {
        Ok(base) => base.join(href).ok()?,
        Err(_) => Url::parse(href).ok()?,
    };
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_http_url() {
        let page = "https://example.com/recipes/x?utm=1";
        assert_eq!(
            resolve_http_url(page, "/recipes/x"),
            Some("https://example.com/recipes/x".to_string())
        );
        assert_eq!(
            resolve_http_url(page, "y"),
            Some("https://example.com/recipes/y".to_string())
        );
        assert_eq!(
            resolve_http_url(page, "https://cdn.example.org/a.jpg"),
            Some("https://cdn.example.org/a.jpg".to_string())
        );
        assert_eq!(resolve_http_url(page, "mailto:chef@example.com"), None);
        assert_eq!(resolve_http_url("", "/relative"), None);
    }

    #[test]
    fn test_normalize_string() {
        assert_eq!(normalize_string("  Boil\n\t the\u{a0}water  "), "Boil the water");
        assert_eq!(normalize_string("Mac &amp;amp; Cheese"), "Mac & Cheese");
        assert_eq!(normalize_string("   "), "");
    }

    #[test]
    fn test_csv_to_tags_dedups_case_insensitively() {
        assert_eq!(
            csv_to_tags("Pasta, pasta salad, PASTA, , Potluck"),
            vec!["Pasta", "pasta salad", "Potluck"]
        );
    }

    #[test]
    fn test_dedup_preserving_order() {
        let items = vec!["pan".to_string(), "whisk".to_string(), "pan".to_string()];
        assert_eq!(dedup_preserving_order(items), vec!["pan", "whisk"]);
    }
}
