use serde::Serialize;

/// A scraped recipe.
///
/// Serialises to camelCase JSON. The mandatory fields are always present;
/// every optional field is omitted from the output when it was not found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecord {
    pub title: String,
    pub ingredients: Vec<String>,
    /// Instruction lines joined by "\n"
    pub instructions: String,
    pub instructions_list: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooking_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl RecipeRecord {
    pub fn to_json(&self) -> serde_json::Value {
        // Serialising plain strings, numbers and lists cannot fail
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Nutrition facts using the schema.org `NutritionInformation` keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Nutrition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturated_fat_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsaturated_fat_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans_fat_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbohydrate_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sugar_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sodium_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cholesterol_content: Option<String>,
}

impl Nutrition {
    /// Slot for a schema.org nutrition key, if it is one we keep.
    pub fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        let slot = match key {
            "servingSize" => &mut self.serving_size,
            "calories" => &mut self.calories,
            "fatContent" => &mut self.fat_content,
            "saturatedFatContent" => &mut self.saturated_fat_content,
            "unsaturatedFatContent" => &mut self.unsaturated_fat_content,
            "transFatContent" => &mut self.trans_fat_content,
            "carbohydrateContent" => &mut self.carbohydrate_content,
            "sugarContent" => &mut self.sugar_content,
            "proteinContent" => &mut self.protein_content,
            "sodiumContent" => &mut self.sodium_content,
            "fiberContent" => &mut self.fiber_content,
            "cholesterolContent" => &mut self.cholesterol_content,
            _ => return None,
        };
        Some(slot)
    }

    pub fn is_empty(&self) -> bool {
        *self == Nutrition::default()
    }
}
