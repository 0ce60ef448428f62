//! # REST API for Reports
//!
//! Each report is available as JSON rows for display and as a CSV download.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::backend::domain::report_service::ReportKind;
use crate::backend::io::rest::errors::error_response;
use crate::backend::AppState;
use shared::ReportResponse;

pub async fn get_report(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/reports/{}", name);

    let report = ReportKind::parse(&name).and_then(|kind| state.report_service.build(kind));
    match report {
        Ok(report) => {
            let response = ReportResponse {
                report: name,
                columns: report.columns.clone(),
                rows: report.rows.iter().map(|row| row.values()).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to build report {}: {}", name, e);
            error_response(&e)
        }
    }
}

pub async fn download_report_csv(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/reports/{}/csv", name);

    match ReportKind::parse(&name).and_then(|kind| state.report_service.export_csv(kind)) {
        Ok(export) => {
            info!(
                "Serving {} with {} rows ({} bytes)",
                export.file_name,
                export.row_count,
                export.content.len()
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", export.file_name),
                    ),
                ],
                export.content,
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to export report {}: {}", name, e);
            error_response(&e)
        }
    }
}
