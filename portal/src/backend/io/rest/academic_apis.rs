//! # REST API for Academic Information

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;

use crate::backend::io::rest::mappers::AcademicsMapper;
use crate::backend::AppState;
use shared::AcademicCalendarResponse;

pub async fn get_calendar(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/academics/calendar");

    let response = AcademicCalendarResponse {
        events: state
            .academic_service
            .calendar()
            .iter()
            .map(AcademicsMapper::to_event_dto)
            .collect(),
    };
    (StatusCode::OK, Json(response))
}

pub async fn get_timetable(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/academics/timetable");

    let response = AcademicsMapper::to_timetable_dto(state.academic_service.timetable());
    (StatusCode::OK, Json(response))
}
