use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod pulse;

/// All routes mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(pulse::router())
}
