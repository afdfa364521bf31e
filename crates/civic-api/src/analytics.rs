use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use civic_core::analytics;
use civic_types::api::AnalyticsQuery;

use crate::error::{ApiError, blocking};
use crate::state::AppState;

/// GET /analytics?department=Roads&top=5 — recomputed on every request.
pub async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let top_n = query.top.unwrap_or(state.default_top_users);
    let department = query.department;

    let snapshot = blocking(&state, move |db| {
        let complaints = db.list_complaints()?;
        let users = db.list_users()?;
        Ok(analytics::analytics_snapshot(&complaints, &users, department, top_n))
    })
    .await?;

    Ok(Json(snapshot))
}
