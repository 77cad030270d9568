//! # REST API for the Fee Catalogue

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use log::info;

use shared::{AddFeeRequest, DeleteFeeResponse, FeeListResponse};

use super::{bad_request, error_response, valid_amount};
use crate::domain::commands::fees::AddFeeCommand;
use crate::AppState;

/// Create a router for fee related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_fees).post(add_fee))
        .route("/:id", delete(delete_fee))
}

pub async fn list_fees(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/fees");

    match state.fee_service.list_fees() {
        Ok(fees) => (StatusCode::OK, Json(FeeListResponse { fees })).into_response(),
        Err(e) => error_response("list fees", e),
    }
}

pub async fn add_fee(State(state): State<AppState>, Json(request): Json<AddFeeRequest>) -> impl IntoResponse {
    info!("POST /api/fees - request: {:?}", request);

    let title = request.title.trim();
    if title.is_empty() {
        return bad_request("Fee title cannot be empty");
    }
    if !valid_amount(request.amount) {
        return bad_request(format!("Invalid fee amount: {}", request.amount));
    }

    let command = AddFeeCommand {
        title: title.to_string(),
        category: request.category,
        amount: request.amount,
    };

    match state.fee_service.add_fee(command) {
        Ok(result) => (StatusCode::CREATED, Json(result.fee)).into_response(),
        Err(e) => error_response("add fee", e),
    }
}

/// Delete a fee and every payment recorded against it
pub async fn delete_fee(State(state): State<AppState>, Path(fee_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/fees/{}", fee_id);

    match state.fee_service.delete_fee(&fee_id) {
        Ok(result) => (
            StatusCode::OK,
            Json(DeleteFeeResponse {
                deleted: result.deleted,
                removed_payments: result.removed_payments,
                success_message: result.success_message,
            }),
        )
            .into_response(),
        Err(e) => error_response("delete fee", e),
    }
}
