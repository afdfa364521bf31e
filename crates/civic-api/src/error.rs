use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use civic_core::{CoreError, Result};
use civic_db::Database;
use civic_types::api::ErrorBody;

use crate::state::AppState;

/// A failed request: the status plus a message safe to show the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            CoreError::Validation { .. } => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            CoreError::Storage(e) => {
                error!("Storage failure: {:#}", e);
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

/// Runs a store operation off the async runtime.
pub async fn blocking<F, T>(state: &AppState, f: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce(&Database) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::internal()
        })?
        .map_err(ApiError::from)
}
