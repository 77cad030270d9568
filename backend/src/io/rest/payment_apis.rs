//! # REST API for Payments

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;

use shared::{PaymentListResponse, RecordPaymentRequest};

use super::{bad_request, error_response, valid_amount};
use crate::domain::commands::fees::RecordPaymentCommand;
use crate::AppState;

/// Create a router for payment related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_payments).post(record_payment))
}

pub async fn list_payments(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/payments");

    match state.fee_service.list_payments() {
        Ok(payments) => (StatusCode::OK, Json(PaymentListResponse { payments })).into_response(),
        Err(e) => error_response("list payments", e),
    }
}

/// Record what a family paid toward a fee; a repeat for the same pair replaces the amount
pub async fn record_payment(
    State(state): State<AppState>,
    Json(request): Json<RecordPaymentRequest>,
) -> impl IntoResponse {
    info!("POST /api/payments - request: {:?}", request);

    if request.family_id.trim().is_empty() || request.fee_id.trim().is_empty() {
        return bad_request("familyId and feeId are required");
    }
    if !valid_amount(request.amount) {
        return bad_request(format!("Invalid payment amount: {}", request.amount));
    }

    let command = RecordPaymentCommand {
        family_id: request.family_id,
        fee_id: request.fee_id,
        amount: request.amount,
    };

    match state.fee_service.record_payment(command) {
        Ok(result) => (StatusCode::CREATED, Json(result.payment)).into_response(),
        Err(e) => error_response("record payment", e),
    }
}
