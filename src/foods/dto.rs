use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct NutritionFactsQuery {
    #[serde(default = "default_quantity")]
    pub quantity: f64,
}

fn default_quantity() -> f64 {
    1.0
}

/// Per-quantity nutrition facts for one food.
#[derive(Debug, Serialize)]
pub struct NutritionFacts {
    pub name: String,
    pub quantity: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}
