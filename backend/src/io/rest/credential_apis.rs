//! # REST API for Credential Lookup
//!
//! Answers whether a phone and password pair matches an issued credential.
//! No session or token is created.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use log::info;

use shared::{CredentialCheckRequest, CredentialCheckResponse};

use super::{bad_request, error_response};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/check", post(check_credential))
}

/// 200 with the family on a match, 401 otherwise
pub async fn check_credential(
    State(state): State<AppState>,
    Json(request): Json<CredentialCheckRequest>,
) -> impl IntoResponse {
    info!("POST /api/credentials/check - phone: {}", request.phone);

    if request.phone.trim().is_empty() {
        return bad_request("phone is required");
    }

    match state.credential_service.check_password(&request.phone, &request.password) {
        Ok(Some(credential)) => (
            StatusCode::OK,
            Json(CredentialCheckResponse {
                family_id: credential.family_id,
                name: credential.name,
            }),
        )
            .into_response(),
        Ok(None) => (StatusCode::UNAUTHORIZED, "Invalid phone or password").into_response(),
        Err(e) => error_response("check credential", e),
    }
}
