use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        is_valid_email,
        jwt::{AuthUser, JwtKeys},
    },
    state::AppState,
    store::StoreError,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    if payload.username.trim().is_empty() {
        warn!("empty username");
        return Err((StatusCode::BAD_REQUEST, "Username is required".into()));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    if payload.password.len() < 6 {
        warn!("password too short");
        return Err((
            StatusCode::BAD_REQUEST,
            "Password must be at least 6 characters long".into(),
        ));
    }

    let user_id = match state
        .store
        .create_user(&payload.username, &payload.email, &payload.password)
    {
        Ok(id) => id,
        Err(StoreError::DuplicateCredential) => {
            warn!(username = %payload.username, "username or email already exists");
            return Err((
                StatusCode::CONFLICT,
                "Username or email already exists".into(),
            ));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let user = state.store.get_user(user_id).ok_or_else(|| {
        error!(user_id = %user_id, "user vanished after create");
        (StatusCode::INTERNAL_SERVER_ERROR, "User not found".into())
    })?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user_id).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    info!(user_id = %user_id, username = %user.username, "user registered");
    Ok(Json(AuthResponse {
        access_token,
        user: PublicUser::from(user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let user = match state.store.get_user_by_username(&payload.username) {
        Some(u) => u,
        None => {
            warn!(username = %payload.username, "login unknown username");
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
        }
    };

    let ok = state
        .store
        .verify_password(&user, &payload.password)
        .map_err(|e| {
            error!(error = %e, "verify_password failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    if !ok {
        warn!(username = %payload.username, user_id = %user.id, "login invalid password");
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        user: PublicUser::from(user),
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = state.store.get_user(user_id).ok_or_else(|| {
        warn!(user_id = %user_id, "token for deleted user");
        (StatusCode::UNAUTHORIZED, "User not found".into())
    })?;
    Ok(Json(PublicUser::from(user)))
}
