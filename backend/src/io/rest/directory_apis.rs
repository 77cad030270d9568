//! # REST API for Reloading the Directory

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use log::info;

use shared::RefreshResponse;

use super::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/refresh", post(refresh))
}

/// Re-read all lists and the notification from the store
pub async fn refresh(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/refresh");

    match state.directory_service.refresh() {
        Ok(result) => (
            StatusCode::OK,
            Json(RefreshResponse {
                families: result.families,
                fees: result.fees,
                payments: result.payments,
                notification: result.notification,
            }),
        )
            .into_response(),
        Err(e) => error_response("refresh directory", e),
    }
}
