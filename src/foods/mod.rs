mod dto;
pub mod handlers;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::read_routes()
}
