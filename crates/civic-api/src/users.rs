use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use civic_core::{rewards, users};
use civic_types::api::{LeaderboardQuery, PointsRequest, ProvisionUserRequest};

use crate::error::{ApiError, blocking};
use crate::state::AppState;

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = blocking(&state, users::list_users).await?;
    Ok(Json(users))
}

pub async fn provision_user(
    State(state): State<AppState>,
    Json(req): Json<ProvisionUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = blocking(&state, move |db| users::provision_user(db, req)).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn user_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = blocking(&state, move |db| users::summary(db, id)).await?;
    Ok(Json(summary))
}

/// POST /users/{id}/points — raw ledger adjustment, applied every time.
pub async fn update_points(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PointsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let delta = req.delta;
    let user = blocking(&state, move |db| rewards::update_user_points(db, id, delta)).await?;
    Ok(Json(user))
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let users = blocking(&state, move |db| users::leaderboard(db, query.limit)).await?;
    Ok(Json(users))
}
