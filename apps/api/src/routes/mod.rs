pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::roadmap::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/roadmap",
            post(handlers::handle_create_roadmap)
                .get(handlers::handle_get_roadmap)
                .put(handlers::handle_update_roadmap),
        )
        .route(
            "/api/v1/roadmap/progress",
            get(handlers::handle_get_progress),
        )
        .route(
            "/api/v1/roadmap/regenerate",
            post(handlers::handle_regenerate_roadmap),
        )
        .route(
            "/api/v1/roadmap/goals/:category/:index",
            patch(handlers::handle_set_goal_completion),
        )
        .with_state(state)
}
