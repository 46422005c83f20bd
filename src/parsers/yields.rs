use crate::lookup::Lookup;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// (singular, plural) nouns a recipe can yield, checked by substring.
const RECIPE_YIELD_TYPES: &[(&str, &str)] = &[
    ("dozen", "dozen"),
    ("batch", "batches"),
    ("cake", "cakes"),
    ("sandwich", "sandwiches"),
    ("bun", "buns"),
    ("cookie", "cookies"),
    ("muffin", "muffins"),
    ("cupcake", "cupcakes"),
    ("loaf", "loaves"),
    ("pie", "pies"),
    ("cup", "cups"),
    ("pint", "pints"),
    ("gallon", "gallons"),
    ("ounce", "ounces"),
    ("pound", "pounds"),
    ("gram", "grams"),
    ("liter", "liters"),
    ("piece", "pieces"),
    ("layer", "layers"),
    ("scoop", "scoops"),
    ("bar", "bars"),
    ("patty", "patties"),
    ("hamburger bun", "hamburger buns"),
    ("pancake", "pancakes"),
    ("item", "items"),
];

static RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\s*(?:-|–|\bto\b)\s*(\d+)").unwrap());
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static GENERIC_ITEMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:sandwiches|taquitos|tacquitos|makes|cups|appetizers?|porzioni|cookies|(?:large |small )?buns)\b",
    )
    .unwrap()
});

/// A classified yield such as "12 cookies".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Yield {
    pub quantity: u32,
    pub noun: String,
}

impl fmt::Display for Yield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity, self.noun)
    }
}

fn quantity(text: &str) -> u32 {
    if let Some(captures) = RANGE.captures(text) {
        if let Ok(upper) = captures[1].parse() {
            return upper;
        }
    }
    NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Longest table noun contained in the text, first entry winning ties.
fn best_noun(lowered: &str) -> Option<(&'static str, &'static str)> {
    let mut best: Option<(&'static str, &'static str)> = None;
    let mut best_len = 0;
    for &(singular, plural) in RECIPE_YIELD_TYPES {
        let len = if lowered.contains(singular) {
            singular.len()
        } else if lowered.contains(plural) {
            plural.len()
        } else {
            continue;
        };
        if len > best_len {
            best = Some((singular, plural));
            best_len = len;
        }
    }
    best
}

/// Classify yield text into "<quantity> <noun>".
///
/// Only empty text is `NotFound`; text without a recognised noun falls back
/// to "item(s)" for generic item words and "serving(s)" otherwise.
pub fn parse_yield(text: &str) -> Lookup<Yield> {
    let text = text.trim();
    if text.is_empty() {
        return Lookup::NotFound;
    }

    let quantity = quantity(text);
    let lowered = text.to_lowercase();
    let (singular, plural) = best_noun(&lowered).unwrap_or_else(|| {
        if GENERIC_ITEMS.is_match(text) {
            ("item", "items")
        } else {
            ("serving", "servings")
        }
    });

    let noun = if quantity == 1 { singular } else { plural };
    Lookup::Found(Yield {
        quantity,
        noun: noun.to_string(),
    })
}
