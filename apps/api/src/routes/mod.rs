pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::tracker::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/applications",
            post(handlers::handle_submit).get(handlers::handle_list),
        )
        .route(
            "/api/v1/applications/export",
            get(handlers::handle_export),
        )
        .with_state(state)
}
