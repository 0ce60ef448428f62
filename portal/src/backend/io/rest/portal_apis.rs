//! # REST API for Portal Home
//!
//! Health check, college contact details and admission updates.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::backend::io::rest::errors::error_response;
use crate::backend::AppState;
use shared::{AdmissionUpdatesResponse, HealthResponse, PortalInfoResponse};

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.record_store.counts() {
        Ok(counts) => {
            let response = HealthResponse {
                status: "ok".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                students: counts.students,
                uploads: counts.uploads,
                transactions: counts.transactions,
                service_requests: counts.service_requests,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            error_response(&e)
        }
    }
}

pub async fn portal_info(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/portal/info");

    let response = PortalInfoResponse {
        college_name: state.college.name.clone(),
        contact_email: state.college.contact_email.clone(),
        contact_phone: state.college.contact_phone.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(response))
}

pub async fn admission_updates(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/portal/updates");

    let updates = state.college.admission_updates.clone();
    let message = if updates.is_empty() {
        "No new updates.".to_string()
    } else {
        format!("{} update(s)", updates.len())
    };
    (StatusCode::OK, Json(AdmissionUpdatesResponse { updates, message }))
}
