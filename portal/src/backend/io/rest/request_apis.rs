//! # REST API for Service Requests
//!
//! Scholarship, internship, bus pass, exam and the other student forms all
//! share one submit endpoint keyed by `kind`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};
use serde::Deserialize;

use crate::backend::domain::commands::requests::ServiceRequestQuery;
use crate::backend::domain::error::PortalError;
use crate::backend::domain::models::service_request::RequestKind;
use crate::backend::io::rest::errors::error_response;
use crate::backend::io::rest::mappers::RequestMapper;
use crate::backend::AppState;
use shared::{ServiceRequestListResponse, ServiceRequestResponse, SubmitServiceRequest};

#[derive(Debug, Deserialize)]
pub struct RequestListParams {
    pub student_id: Option<String>,
    pub kind: Option<String>,
}

/// Submit a form for a student
pub async fn submit_request(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(request): Json<SubmitServiceRequest>,
) -> impl IntoResponse {
    info!("POST /api/students/{}/requests - kind: {}", student_id, request.kind);

    let command = RequestMapper::to_command(student_id, request);
    match state.record_store.record_service_request(command) {
        Ok(stored) => {
            let response = ServiceRequestResponse {
                success_message: format!("{} submitted (reference {})", stored.kind.label(), stored.id),
                request: RequestMapper::to_dto(stored),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to submit service request: {}", e);
            error_response(&e)
        }
    }
}

/// List submitted forms, filtered by student and/or kind
pub async fn list_requests(
    State(state): State<AppState>,
    Query(params): Query<RequestListParams>,
) -> impl IntoResponse {
    info!("GET /api/requests - params: {:?}", params);

    let kind = match params.kind.as_deref() {
        Some(name) => match RequestKind::from_name(name) {
            Some(kind) => Some(kind),
            None => {
                return error_response(&PortalError::InvalidInput(format!(
                    "Unknown request kind '{}'",
                    name
                )))
            }
        },
        None => None,
    };

    let query = ServiceRequestQuery {
        student_id: params.student_id,
        kind,
    };
    match state.record_store.list_service_requests(&query) {
        Ok(requests) => {
            let response = ServiceRequestListResponse {
                requests: requests.into_iter().map(RequestMapper::to_dto).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list service requests: {}", e);
            error_response(&e)
        }
    }
}
