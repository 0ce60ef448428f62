//! # REST API for Document Uploads
//!
//! Uploads arrive as `multipart/form-data`; every part that carries a filename
//! is stored as one document, in the order the parts were sent.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use log::{error, info, warn};

use crate::backend::domain::error::PortalError;
use crate::backend::io::rest::errors::{error_response, run_blocking};
use crate::backend::io::rest::mappers::UploadMapper;
use crate::backend::AppState;
use shared::{UploadListResponse, UploadResponse};

/// Upload one or more documents for a student
pub async fn upload_documents(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    info!("POST /api/students/{}/uploads", student_id);

    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                return error_response(&PortalError::InvalidInput(format!(
                    "Malformed upload: {}",
                    e
                )));
            }
        };

        let Some(filename) = field.file_name().map(str::to_string) else {
            // Plain form fields carry no document
            continue;
        };
        match field.bytes().await {
            Ok(bytes) => files.push((filename, bytes.to_vec())),
            Err(e) => {
                warn!("Failed to read upload '{}': {}", filename, e);
                return error_response(&PortalError::InvalidInput(format!(
                    "Failed to read upload '{}': {}",
                    filename, e
                )));
            }
        }
    }

    let service = state.document_service.clone();
    let owner = student_id.clone();
    match run_blocking(move || service.upload_documents(&owner, files)).await {
        Ok(records) => {
            let success_message = format!(
                "Uploaded {} for student {}",
                records
                    .iter()
                    .map(|r| r.filename.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                student_id
            );
            let response = UploadResponse {
                uploads: records.into_iter().map(UploadMapper::to_dto).collect(),
                success_message,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to upload documents for {}: {}", student_id, e);
            error_response(&e)
        }
    }
}

/// Upload history and currently stored files of a student
pub async fn list_uploads(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/students/{}/uploads", student_id);

    let listing = state
        .document_service
        .list_documents(&student_id)
        .and_then(|uploads| Ok((uploads, state.document_service.stored_files(&student_id)?)));

    match listing {
        Ok((uploads, stored)) => {
            let response = UploadListResponse {
                uploads: uploads.into_iter().map(UploadMapper::to_dto).collect(),
                stored_files: stored.into_iter().map(UploadMapper::to_stored_file).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list uploads for {}: {}", student_id, e);
            error_response(&e)
        }
    }
}

/// Download the current content of an uploaded document
pub async fn download_upload(
    State(state): State<AppState>,
    Path(upload_id): Path<String>,
) -> Response {
    info!("GET /api/uploads/{}/content", upload_id);

    let service = state.document_service.clone();
    let id = upload_id.clone();
    match run_blocking(move || service.read_document(&id)).await {
        Ok((record, content)) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                record.filename.replace('"', "")
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type_for(&record.filename).to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                content,
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to read upload {}: {}", upload_id, e);
            error_response(&e)
        }
    }
}

fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("marksheet.PDF"), "application/pdf");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }
}
