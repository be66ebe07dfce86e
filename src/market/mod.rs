use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod model;
pub mod service;

pub fn router() -> Router<AppState> {
    handlers::sell_routes()
}
