use recipe_scrape::extractors::{microdata_items, ParseOptions, ParsingContext, StructuredDataDocument};
use recipe_scrape::{scrape_html, Lookup, RecipeScraper, ScraperConfig};

const BANANA_BREAD: &str = r#"
<html>
<body>
<div class="easyrecipe" itemscope itemtype="http://schema.org/Recipe">
    <div itemprop="name">Mom's Famous Banana Bread</div>
    <div itemprop="description">Mom was kind enough to share her famous banana bread recipe with us!</div>
    <img itemprop="image" src="https://example.com/banana-bread.jpg" />
    <div itemprop="author" itemscope itemtype="http://schema.org/Person">
        <span itemprop="name">Cooking Divine</span>
    </div>
    <div itemprop="recipeCategory">Breakfast</div>
    <div itemprop="keywords">banana, bread, sweet</div>
    <time itemprop="prepTime" datetime="PT10M">10 mins</time>
    <time itemprop="cookTime" datetime="PT1H">1 hour</time>
    <span itemprop="recipeYield">1 loaf</span>
    <ul>
        <li itemprop="recipeIngredient">3 ripe bananas</li>
        <li itemprop="recipeIngredient">1/3 cup melted butter</li>
        <li itemprop="recipeIngredient">1 1/2 cups flour</li>
    </ul>
    <ol>
        <li itemprop="recipeInstructions">Preheat the oven to 175C.</li>
        <li itemprop="recipeInstructions">Mash the bananas with the butter.</li>
        <li itemprop="recipeInstructions">Stir in the flour and bake for an hour.</li>
    </ol>
    <div itemprop="aggregateRating" itemscope itemtype="http://schema.org/AggregateRating">
        <meta itemprop="ratingValue" content="4.8">
        <meta itemprop="reviewCount" content="31">
    </div>
</div>
</body>
</html>
"#;

#[test]
fn test_microdata_recipe() {
    let recipe = scrape_html(BANANA_BREAD, "https://example.com/banana-bread").unwrap();

    assert_eq!(recipe.title, "Mom's Famous Banana Bread");
    assert_eq!(recipe.author.as_deref(), Some("Cooking Divine"));
    assert_eq!(
        recipe.image.as_deref(),
        Some("https://example.com/banana-bread.jpg")
    );
    assert_eq!(recipe.category.as_deref(), Some("Breakfast"));
    assert_eq!(recipe.prep_time, Some(10));
    assert_eq!(recipe.cook_time, Some(60));
    assert_eq!(recipe.total_time, Some(70));
    assert_eq!(recipe.yields.as_deref(), Some("1 loaf"));
    assert_eq!(recipe.servings, Some(1));
    assert_eq!(recipe.rating, Some(4.8));
    assert_eq!(recipe.review_count, Some(31));
    assert_eq!(
        recipe.ingredients,
        vec!["3 ripe bananas", "1/3 cup melted butter", "1 1/2 cups flour"]
    );
    assert_eq!(recipe.instructions_list.len(), 3);
    assert_eq!(
        recipe.keywords,
        Some(vec![
            "banana".to_string(),
            "bread".to_string(),
            "sweet".to_string()
        ])
    );
}

#[test]
fn test_microdata_items_shape() {
    let context = ParsingContext::new(BANANA_BREAD, "https://example.com/banana-bread");
    let items = microdata_items(&context.document);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["@type"], "Recipe");
    assert_eq!(items[0]["author"]["@type"], "Person");
    assert_eq!(items[0]["recipeIngredient"].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_microdata_can_be_disabled() {
    let context = ParsingContext::new(BANANA_BREAD, "https://example.com/banana-bread");
    let options = ParseOptions {
        microdata: false,
        ..Default::default()
    };
    let document = StructuredDataDocument::parse(&context, &options);

    assert!(!document.has_recipe());
    assert_eq!(document.title(), Lookup::NotFound);

    let config = ScraperConfig {
        microdata: false,
        ..Default::default()
    };
    let scraper = RecipeScraper::from_config(config).unwrap();
    assert!(scraper.scrape(BANANA_BREAD, "https://example.com/banana-bread").is_err());
}
