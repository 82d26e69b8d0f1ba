mod dto;
pub mod handlers;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::admin_routes()
}
