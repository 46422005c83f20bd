use recipe_scrape::extractors::ParsingContext;
use recipe_scrape::pipeline::{Field, FieldValue};
use recipe_scrape::{
    Lookup, RecipeScraper, ScrapeError, ScraperConfig, SelectorOverride, SiteOverride,
    SiteRegistry,
};
use std::collections::HashMap;

const PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head>
    <script type="application/ld+json">
    {
        "@type": "Recipe",
        "name": "Recipe | Example Kitchen",
        "author": "Example Kitchen",
        "recipeIngredient": ["2 cups rice", "4 cups water"],
        "recipeInstructions": "Rinse the rice.\nSimmer for 18 minutes."
    }
    </script>
</head>
<body>
    <h1 class="post-title">Perfect Rice</h1>
    <p class="byline">by <span class="chef">Ana Lopez</span></p>
</body>
</html>
"#;

/// Cleans up the title and reads the byline that the structured data gets wrong.
struct ExampleKitchen;

impl SiteOverride for ExampleKitchen {
    fn host(&self) -> &str {
        "www.examplekitchen.com"
    }

    fn extract(&self, field: Field, context: &ParsingContext) -> Lookup<FieldValue> {
        let selector = match field {
            Field::Title => "h1.post-title",
            Field::Author => ".byline .chef",
            _ => return Lookup::NotFound,
        };
        let Ok(selector) = scraper::Selector::parse(selector) else {
            return Lookup::NotFound;
        };
        context
            .document
            .select(&selector)
            .next()
            .map(|el| FieldValue::Text(el.text().collect::<String>().trim().to_string()))
            .into()
    }
}

fn scraper_with(site: impl SiteOverride + 'static) -> RecipeScraper {
    let mut registry = SiteRegistry::new();
    registry.register(site);
    RecipeScraper::new(ScraperConfig::default(), registry)
}

#[test]
fn test_override_wins_for_its_host() {
    let scraper = scraper_with(ExampleKitchen);
    let recipe = scraper
        .scrape(PAGE, "https://examplekitchen.com/perfect-rice")
        .unwrap();

    assert_eq!(recipe.title, "Perfect Rice");
    assert_eq!(recipe.author.as_deref(), Some("Ana Lopez"));
    // fields the override does not handle still come from structured data
    assert_eq!(recipe.ingredients, vec!["2 cups rice", "4 cups water"]);
}

#[test]
fn test_www_prefix_is_ignored() {
    let scraper = scraper_with(ExampleKitchen);
    let recipe = scraper
        .scrape(PAGE, "https://www.examplekitchen.com/perfect-rice")
        .unwrap();

    assert_eq!(recipe.title, "Perfect Rice");
}

#[test]
fn test_other_hosts_are_untouched() {
    let scraper = scraper_with(ExampleKitchen);
    let recipe = scraper
        .scrape(PAGE, "https://another-site.com/perfect-rice")
        .unwrap();

    assert_eq!(recipe.title, "Recipe | Example Kitchen");
    assert_eq!(recipe.author.as_deref(), Some("Example Kitchen"));
}

#[test]
fn test_selector_override_from_config() {
    let html = r#"
        <html><body>
            <h2 class="title">Green Salad</h2>
            <ul class="ing"><li>lettuce</li><li>olive oil</li></ul>
            <div class="steps"><p>Wash the lettuce.</p><p>Dress and toss.</p></div>
            <span class="time">10 mins</span>
        </body></html>
    "#;
    let mut selectors = HashMap::new();
    selectors.insert("title".to_string(), "h2.title".to_string());
    selectors.insert("ingredients".to_string(), ".ing li".to_string());
    selectors.insert("instructions".to_string(), ".steps p".to_string());
    selectors.insert("total_time".to_string(), "span.time".to_string());

    let mut config = ScraperConfig::default();
    config.sites.insert("salads.example".to_string(), selectors);
    let scraper = RecipeScraper::from_config(config).unwrap();

    let recipe = scraper.scrape(html, "https://salads.example/green").unwrap();
    assert_eq!(recipe.title, "Green Salad");
    assert_eq!(recipe.ingredients, vec!["lettuce", "olive oil"]);
    assert_eq!(recipe.instructions, "Wash the lettuce.\nDress and toss.");
    assert_eq!(recipe.total_time, Some(10));
}

#[test]
fn test_invalid_config_selector() {
    let mut selectors = HashMap::new();
    selectors.insert("title".to_string(), "h2[".to_string());
    let mut config = ScraperConfig::default();
    config.sites.insert("salads.example".to_string(), selectors);

    let err = RecipeScraper::from_config(config).unwrap_err();
    assert!(matches!(err, ScrapeError::InvalidSelector { .. }));
}

#[test]
fn test_registry_replaces_same_host() {
    let mut registry = SiteRegistry::new();
    registry.register(ExampleKitchen);
    registry.register(
        SelectorOverride::new("examplekitchen.com")
            .with_selector(Field::Title, "p.byline")
            .unwrap(),
    );
    assert_eq!(registry.len(), 1);

    let recipe = RecipeScraper::new(ScraperConfig::default(), registry)
        .scrape(PAGE, "https://examplekitchen.com/perfect-rice")
        .unwrap();
    assert_eq!(recipe.title, "by Ana Lopez");
}

#[test]
fn test_config_errors_follow_host_order() {
    let mut config = ScraperConfig::default();
    let hosts = [
        ("zucchini.example", "p["),
        ("apple.example", "h1["),
        ("melon.example", "[x"),
    ];
    for (host, css) in hosts {
        let mut selectors = HashMap::new();
        selectors.insert("title".to_string(), css.to_string());
        config.sites.insert(host.to_string(), selectors);
    }

    for _ in 0..5 {
        let err = RecipeScraper::from_config(config.clone()).unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::InvalidSelector { ref selector, .. } if selector == "h1["
        ));
    }
}
