pub mod analytics;
pub mod complaints;
pub mod error;
pub mod state;
pub mod users;

use axum::{
    Json, Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Every portal route. Transport layers (CORS, tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/complaints",
            get(complaints::list_complaints).post(complaints::create_complaint),
        )
        .route(
            "/complaints/{id}",
            get(complaints::get_complaint).patch(complaints::update_complaint),
        )
        .route("/complaints/{id}/resolve", post(complaints::resolve_complaint))
        .route("/complaints/{id}/votes", post(complaints::vote_complaint))
        .route("/users", get(users::list_users).post(users::provision_user))
        .route("/users/{id}/summary", get(users::user_summary))
        .route("/users/{id}/points", post(users::update_points))
        .route("/leaderboard", get(users::leaderboard))
        .route("/analytics", get(analytics::get_analytics))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
