//! # REST API for the Notification Banner

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;

use shared::{NotificationResponse, UpdateNotificationRequest};

use super::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_notification).put(update_notification))
}

pub async fn get_notification(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/notification");

    match state.notification_service.get_notification() {
        Ok(notification) => (StatusCode::OK, Json(NotificationResponse { notification })).into_response(),
        Err(e) => error_response("get notification", e),
    }
}

/// Set the banner; empty text clears it
pub async fn update_notification(
    State(state): State<AppState>,
    Json(request): Json<UpdateNotificationRequest>,
) -> impl IntoResponse {
    info!("PUT /api/notification");

    match state.notification_service.update_notification(&request.text) {
        Ok(notification) => (StatusCode::OK, Json(NotificationResponse { notification })).into_response(),
        Err(e) => error_response("update notification", e),
    }
}
