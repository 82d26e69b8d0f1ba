use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use time::{macros::format_description, Date};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::nutrition::NutritionTotals;
use crate::state::AppState;
use crate::store::types::Meal;

use super::dto::{AddMealRequest, CreatedMealResponse, DailySummary};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/by_date/:date", get(meals_by_date))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(add_meal))
        .route("/meals/:id", delete(delete_meal))
}

fn validate_date(date: &str) -> Result<(), (StatusCode, String)> {
    let iso_date = format_description!("[year]-[month]-[day]");
    Date::parse(date, &iso_date).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            "Date must be an ISO-8601 calendar date".to_string(),
        )
    })?;
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn add_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddMealRequest>,
) -> Result<Json<CreatedMealResponse>, (StatusCode, String)> {
    if !(payload.quantity.is_finite() && payload.quantity > 0.0) {
        warn!(quantity = payload.quantity, "invalid quantity");
        return Err((StatusCode::BAD_REQUEST, "Quantity must be positive".into()));
    }
    validate_date(&payload.date)?;

    match state
        .store
        .add_meal(user_id, payload.food_id, payload.quantity, &payload.date)
    {
        Some(id) => {
            info!(meal_id = %id, %user_id, "meal logged");
            Ok(Json(CreatedMealResponse { id }))
        }
        None => {
            warn!(food_id = %payload.food_id, "meal references unknown food");
            Err((StatusCode::NOT_FOUND, "Food not found".into()))
        }
    }
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Json<Vec<Meal>> {
    Json(state.store.get_user_meals(user_id))
}

#[instrument(skip(state))]
pub async fn meals_by_date(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> Result<Json<DailySummary>, (StatusCode, String)> {
    validate_date(&date)?;
    let meals = state.store.get_user_meals_by_date(user_id, &date);
    let totals = NutritionTotals::sum(&meals);
    Ok(Json(DailySummary {
        date,
        meals,
        totals,
    }))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.store.delete_meal(id, user_id) {
        info!(meal_id = %id, %user_id, "meal deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        warn!(meal_id = %id, %user_id, "meal not found or not owned");
        Err((StatusCode::NOT_FOUND, "Meal not found".into()))
    }
}
