//! Translation of domain errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;

use crate::backend::domain::error::{PortalError, PortalResult};

pub fn status_for(error: &PortalError) -> StatusCode {
    match error {
        PortalError::UnknownStudent(_) | PortalError::NotFound(_) => StatusCode::NOT_FOUND,
        PortalError::InvalidInput(_) | PortalError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        PortalError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(error: &PortalError) -> Response {
    let body = ErrorResponse {
        error: error.kind().to_string(),
        message: error.to_string(),
    };
    (status_for(error), Json(body)).into_response()
}

/// Run blocking domain work (file I/O) off the async executor
pub async fn run_blocking<T, F>(work: F) -> PortalResult<T>
where
    F: FnOnce() -> PortalResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| PortalError::StorageFailure(format!("Background task failed: {}", e)))?
}
