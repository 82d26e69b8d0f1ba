use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::dto::PublicUser;
use crate::store::types::Meal;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_foods: usize,
    pub total_meals: usize,
    /// Newest accounts first, at most five.
    pub recent_users: Vec<PublicUser>,
    /// Newest meals first, at most ten.
    pub recent_meals: Vec<Meal>,
}

#[derive(Debug, Deserialize)]
pub struct FoodPayload {
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
}

#[derive(Debug, Serialize)]
pub struct CreatedFoodResponse {
    pub id: Uuid,
}
