use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::dto::PublicUser;
use crate::auth::jwt::AdminUser;
use crate::state::AppState;

use super::dto::{CreatedFoodResponse, DashboardStats, FoodPayload};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/foods", post(add_food))
        .route("/admin/foods/:id", put(update_food).delete(delete_food))
        .route("/admin/users", get(list_users))
        .route("/admin/users/:id", delete(delete_user))
}

fn validate_food(payload: &FoodPayload) -> Result<(), (StatusCode, String)> {
    if payload.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Food name is required".into()));
    }
    let macros = [
        payload.calories,
        payload.protein,
        payload.carbs,
        payload.fat,
        payload.fiber,
    ];
    if macros.iter().any(|m| !m.is_finite() || *m < 0.0) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Macro values must be non-negative numbers".into(),
        ));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Json<DashboardStats> {
    let mut users = state.store.list_users();
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let mut meals = state.store.list_meals();
    meals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(DashboardStats {
        total_users: users.len(),
        total_foods: state.store.list_foods().len(),
        total_meals: meals.len(),
        recent_users: users.into_iter().take(5).map(PublicUser::from).collect(),
        recent_meals: meals.into_iter().take(10).collect(),
    })
}

#[instrument(skip(state, payload))]
pub async fn add_food(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Json(payload): Json<FoodPayload>,
) -> Result<Json<CreatedFoodResponse>, (StatusCode, String)> {
    validate_food(&payload)?;
    let id = state.store.add_food(
        &payload.name,
        payload.calories,
        payload.protein,
        payload.carbs,
        payload.fat,
        payload.fiber,
    );
    info!(food_id = %id, name = %payload.name, %admin_id, "food added");
    Ok(Json(CreatedFoodResponse { id }))
}

#[instrument(skip(state, payload))]
pub async fn update_food(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FoodPayload>,
) -> Result<StatusCode, (StatusCode, String)> {
    validate_food(&payload)?;
    if state.store.update_food(
        id,
        &payload.name,
        payload.calories,
        payload.protein,
        payload.carbs,
        payload.fat,
        payload.fiber,
    ) {
        info!(food_id = %id, %admin_id, "food updated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Food not found".into()))
    }
}

#[instrument(skip(state))]
pub async fn delete_food(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.store.delete_food(id) {
        info!(food_id = %id, %admin_id, "food deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Food not found".into()))
    }
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Json<Vec<PublicUser>> {
    Json(
        state
            .store
            .list_users()
            .into_iter()
            .map(PublicUser::from)
            .collect(),
    )
}

/// Administrators cannot be deleted through this endpoint. That rule lives
/// here, not in the store: the store's delete_user removes anyone.
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let user = state
        .store
        .get_user(id)
        .ok_or((StatusCode::NOT_FOUND, "User not found".to_string()))?;
    if user.is_admin {
        warn!(user_id = %id, %admin_id, "refused to delete admin user");
        return Err((StatusCode::FORBIDDEN, "Cannot delete admin user".into()));
    }
    if state.store.delete_user(id) {
        info!(user_id = %id, %admin_id, "user deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "User not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_id(state: &AppState) -> Uuid {
        state
            .store
            .get_user_by_username("admin")
            .expect("seeded admin")
            .id
    }

    #[tokio::test]
    async fn dashboard_counts_entities() {
        let state = AppState::fake();
        let admin = admin_id(&state);
        let stats = dashboard(State(state.clone()), AdminUser(admin)).await.0;
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.total_foods, 15);
        assert_eq!(stats.total_meals, 0);
        assert_eq!(stats.recent_users.len(), 1);
        assert!(stats.recent_meals.is_empty());
    }

    #[tokio::test]
    async fn dashboard_lists_recent_activity_newest_first() {
        let state = AppState::fake();
        let admin = admin_id(&state);
        let alice = state
            .store
            .create_user("alice", "a@x.com", "secret1")
            .expect("create should succeed");
        let food = state.store.add_food("Rice", 111.0, 2.6, 23.0, 0.9, 1.8);
        for day in 1..=12 {
            state
                .store
                .add_meal(alice, food, 1.0, &format!("2024-01-{day:02}"))
                .expect("food exists");
        }

        let stats = dashboard(State(state), AdminUser(admin)).await.0;
        assert_eq!(stats.total_meals, 12);
        // Recent activity is capped at five users and ten meals.
        assert_eq!(stats.recent_users.len(), 2);
        assert_eq!(stats.recent_meals.len(), 10);
        // Alice registered after the seeded admin, so she comes first.
        assert_eq!(stats.recent_users[0].username, "alice");
        assert!(stats.recent_meals.iter().all(|m| m.user_id == alice));
    }

    #[tokio::test]
    async fn food_crud_via_admin_handlers() {
        let state = AppState::fake();
        let admin = admin_id(&state);

        let created = add_food(
            State(state.clone()),
            AdminUser(admin),
            Json(FoodPayload {
                name: "Tofu".into(),
                calories: 76.0,
                protein: 8.0,
                carbs: 1.9,
                fat: 4.8,
                fiber: 0.3,
            }),
        )
        .await
        .expect("add should succeed")
        .0;

        let ok = update_food(
            State(state.clone()),
            AdminUser(admin),
            Path(created.id),
            Json(FoodPayload {
                name: "Firm Tofu".into(),
                calories: 78.0,
                protein: 9.0,
                carbs: 2.0,
                fat: 4.2,
                fiber: 0.3,
            }),
        )
        .await
        .expect("update should succeed");
        assert_eq!(ok, StatusCode::NO_CONTENT);
        assert_eq!(state.store.get_food(created.id).unwrap().name, "Firm Tofu");

        let ok = delete_food(State(state.clone()), AdminUser(admin), Path(created.id))
            .await
            .expect("delete should succeed");
        assert_eq!(ok, StatusCode::NO_CONTENT);
        assert!(state.store.get_food(created.id).is_none());
    }

    #[tokio::test]
    async fn add_food_rejects_blank_name_and_negative_macros() {
        let state = AppState::fake();
        let admin = admin_id(&state);

        let err = add_food(
            State(state.clone()),
            AdminUser(admin),
            Json(FoodPayload {
                name: "  ".into(),
                calories: 10.0,
                protein: 0.0,
                carbs: 0.0,
                fat: 0.0,
                fiber: 0.0,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);

        let err = add_food(
            State(state),
            AdminUser(admin),
            Json(FoodPayload {
                name: "Weird".into(),
                calories: -5.0,
                protein: 0.0,
                carbs: 0.0,
                fat: 0.0,
                fiber: 0.0,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_user_refuses_admin_but_removes_regular_users() {
        let state = AppState::fake();
        let admin = admin_id(&state);
        let alice = state
            .store
            .create_user("alice", "a@x.com", "secret1")
            .expect("create should succeed");

        let err = delete_user(State(state.clone()), AdminUser(admin), Path(admin))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::FORBIDDEN);

        let ok = delete_user(State(state.clone()), AdminUser(admin), Path(alice))
            .await
            .expect("delete should succeed");
        assert_eq!(ok, StatusCode::NO_CONTENT);
        assert!(state.store.get_user(alice).is_none());
    }
}
