use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::nutrition::NutritionTotals;
use crate::state::AppState;
use crate::store::types::Food;

use super::dto::{NutritionFacts, NutritionFactsQuery, SearchQuery};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods))
        .route("/foods/search", get(search_foods))
        .route("/foods/:id", get(get_food))
        .route("/foods/:id/nutrition_facts", get(nutrition_facts))
}

#[instrument(skip(state))]
pub async fn list_foods(State(state): State<AppState>) -> Json<Vec<Food>> {
    Json(state.store.list_foods())
}

#[instrument(skip(state))]
pub async fn search_foods(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<Food>> {
    Json(state.store.search_foods(&params.q))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Food>, (StatusCode, String)> {
    state
        .store
        .get_food(id)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Food not found".into()))
}

#[instrument(skip(state))]
pub async fn nutrition_facts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<NutritionFactsQuery>,
) -> Result<Json<NutritionFacts>, (StatusCode, String)> {
    if !(params.quantity.is_finite() && params.quantity > 0.0) {
        return Err((StatusCode::BAD_REQUEST, "Quantity must be positive".into()));
    }
    let food = state
        .store
        .get_food(id)
        .ok_or((StatusCode::NOT_FOUND, "Food not found".to_string()))?;
    let totals = NutritionTotals::scaled(&food, params.quantity);
    Ok(Json(NutritionFacts {
        name: food.name,
        quantity: params.quantity,
        calories: totals.calories,
        protein: totals.protein,
        carbs: totals.carbs,
        fat: totals.fat,
        fiber: totals.fiber,
    }))
}
