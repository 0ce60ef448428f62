//! # REST API for Fee Payments

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};
use serde::Deserialize;

use crate::backend::domain::error::PortalError;
use crate::backend::io::rest::errors::error_response;
use crate::backend::io::rest::mappers::TransactionMapper;
use crate::backend::AppState;
use shared::{PaymentRequest, PaymentResponse, TransactionListResponse};

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    pub student_id: Option<String>,
}

/// Pay a fee on behalf of a student
pub async fn record_payment(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(request): Json<PaymentRequest>,
) -> impl IntoResponse {
    info!("POST /api/students/{}/payments - request: {:?}", student_id, request);

    let command = TransactionMapper::to_command(student_id, request);
    match state.record_store.record_transaction(command) {
        Ok(transaction) => {
            let response = PaymentResponse {
                success_message: format!(
                    "Payment of {:.2} successful (transaction {})",
                    transaction.amount, transaction.id
                ),
                transaction: TransactionMapper::to_dto(transaction),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to record payment: {}", e);
            error_response(&e)
        }
    }
}

/// List transactions, optionally for one student
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> impl IntoResponse {
    info!("GET /api/transactions - query: {:?}", query);

    let student_id = query.student_id.as_deref();
    if let Some(id) = student_id {
        match state.record_store.student_exists(id) {
            Ok(true) => {}
            Ok(false) => return error_response(&PortalError::UnknownStudent(id.to_string())),
            Err(e) => return error_response(&e),
        }
    }

    match state.record_store.list_transactions(student_id) {
        Ok(transactions) => {
            let response = TransactionListResponse {
                transactions: transactions.into_iter().map(TransactionMapper::to_dto).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list transactions: {}", e);
            error_response(&e)
        }
    }
}
