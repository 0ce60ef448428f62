//! # REST API for Student Records
//!
//! Registration, profile lookup and profile edits.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::backend::io::rest::errors::error_response;
use crate::backend::io::rest::mappers::StudentMapper;
use crate::backend::AppState;
use shared::{RegisterStudentRequest, StudentListResponse, StudentResponse, UpdateStudentRequest};

/// Register a new student
pub async fn register_student(
    State(state): State<AppState>,
    Json(request): Json<RegisterStudentRequest>,
) -> impl IntoResponse {
    info!("POST /api/students - request: {:?}", request);

    let command = StudentMapper::to_register_command(request);
    match state.record_store.register_student(command) {
        Ok(student) => {
            let success_message = format!(
                "Registered {} with ID {}",
                student.full_name(),
                student.id
            );
            let response = StudentResponse {
                student: StudentMapper::to_dto(student),
                success_message,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to register student: {}", e);
            error_response(&e)
        }
    }
}

/// List all students in registration order
pub async fn list_students(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/students");

    match state.record_store.list_students() {
        Ok(students) => {
            let response = StudentListResponse {
                students: students.into_iter().map(StudentMapper::to_dto).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list students: {}", e);
            error_response(&e)
        }
    }
}

/// Admission details of one student
pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/students/{}", student_id);

    match state.record_store.get_student(&student_id) {
        Ok(student) => (StatusCode::OK, Json(StudentMapper::to_dto(student))).into_response(),
        Err(e) => {
            error!("Failed to get student {}: {}", student_id, e);
            error_response(&e)
        }
    }
}

/// Edit the provided profile fields
pub async fn update_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(request): Json<UpdateStudentRequest>,
) -> impl IntoResponse {
    info!("PUT /api/students/{} - request: {:?}", student_id, request);

    let command = StudentMapper::to_update_command(student_id, request);
    match state.record_store.update_student(command) {
        Ok(student) => {
            let response = StudentResponse {
                success_message: format!("Profile updated for {}", student.full_name()),
                student: StudentMapper::to_dto(student),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to update student: {}", e);
            error_response(&e)
        }
    }
}
