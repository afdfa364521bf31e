use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use civic_core::browse::{self, ComplaintFilter};
use civic_core::lifecycle;
use civic_core::voting::{self, VoteOutcome};
use civic_types::api::{
    ComplaintListQuery, ComplaintResponse, ComplaintUpdate, CreateComplaintRequest, ErrorBody,
    ResolveResponse, VoteRequest,
};

use crate::error::{ApiError, blocking};
use crate::state::AppState;

/// GET /complaints — filtered and sorted listing.
pub async fn list_complaints(
    State(state): State<AppState>,
    Query(query): Query<ComplaintListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let sort = query.sort.unwrap_or_default();
    let filter = ComplaintFilter::from(query);

    let complaints = blocking(&state, lifecycle::list_complaints).await?;

    let body: Vec<ComplaintResponse> = browse::browse(complaints, &filter, sort)
        .into_iter()
        .map(ComplaintResponse::from)
        .collect();
    Ok(Json(body))
}

/// POST /complaints
pub async fn create_complaint(
    State(state): State<AppState>,
    Json(req): Json<CreateComplaintRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let complaint = blocking(&state, move |db| lifecycle::create_complaint(db, req)).await?;
    Ok((StatusCode::CREATED, Json(ComplaintResponse::from(complaint))))
}

pub async fn get_complaint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let complaint = blocking(&state, move |db| lifecycle::get_complaint(db, id)).await?;
    Ok(Json(ComplaintResponse::from(complaint)))
}

/// PATCH /complaints/{id} — one typed update command per request.
pub async fn update_complaint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ComplaintUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let complaint =
        blocking(&state, move |db| lifecycle::update_complaint(db, id, update)).await?;
    Ok(Json(ComplaintResponse::from(complaint)))
}

/// POST /complaints/{id}/resolve — resolution plus the owner's reward.
pub async fn resolve_complaint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let resolution = blocking(&state, move |db| lifecycle::resolve_complaint(db, id)).await?;
    Ok(Json(ResolveResponse {
        complaint: ComplaintResponse::from(resolution.complaint),
        points_awarded: resolution.points_awarded,
    }))
}

/// POST /complaints/{id}/votes — 409 when the user has already voted.
pub async fn vote_complaint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<VoteRequest>,
) -> Result<Response, ApiError> {
    let user_id = req.user_id;
    let outcome = blocking(&state, move |db| voting::vote_complaint(db, id, user_id)).await?;

    let response = match outcome {
        VoteOutcome::Counted(complaint) => Json(ComplaintResponse::from(complaint)).into_response(),
        VoteOutcome::AlreadyVoted => {
            (StatusCode::CONFLICT, Json(ErrorBody::new(voting::ALREADY_VOTED))).into_response()
        }
    };
    Ok(response)
}
