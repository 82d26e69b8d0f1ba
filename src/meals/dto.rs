use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::nutrition::NutritionTotals;
use crate::store::types::Meal;

#[derive(Debug, Deserialize)]
pub struct AddMealRequest {
    pub food_id: Uuid,
    pub quantity: f64,
    /// ISO-8601 calendar date, e.g. "2024-01-01".
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedMealResponse {
    pub id: Uuid,
}

/// One day of meals plus their summed macros.
#[derive(Debug, Serialize)]
pub struct DailySummary {
    pub date: String,
    pub meals: Vec<Meal>,
    pub totals: NutritionTotals,
}
