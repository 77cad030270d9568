//! # REST API Interface Layer
//!
//! HTTP endpoints for the directory, mounted under `/api`.
//!
//! ## Routes
//!
//! ```text
//! GET    /families?q=             search (all when q is empty or absent)
//! POST   /families                add a family
//! GET    /families/:id            one family
//! PUT    /families/:id            replace top-level fields
//! DELETE /families/:id            remove a family
//! GET    /families/:id/finances   per-fee breakdown
//! GET    /fees                    fee catalogue
//! POST   /fees                    add a fee
//! DELETE /fees/:id                remove a fee and its payments
//! GET    /payments                every payment
//! POST   /payments                record a payment
//! GET    /reports/fees?q=         consolidated report
//! GET    /reports/fees/csv?q=     same report as CSV
//! GET    /notification            banner text
//! PUT    /notification            set or clear the banner
//! POST   /credentials/check       match a phone and password
//! POST   /refresh                 reload everything from the store
//! ```
//!
//! Handlers check ids and amounts before calling the domain and answer 400 on
//! bad input. Domain errors map to 404, 409 or 400; anything else is a 500.

pub mod credential_apis;
pub mod directory_apis;
pub mod family_apis;
pub mod fee_apis;
pub mod notification_apis;
pub mod payment_apis;
pub mod report_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use log::{error, warn};

use crate::domain::DirectoryError;
use crate::AppState;

/// All API routes, to be nested under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/families", family_apis::router())
        .nest("/fees", fee_apis::router())
        .nest("/payments", payment_apis::router())
        .nest("/reports", report_apis::router())
        .nest("/notification", notification_apis::router())
        .nest("/credentials", credential_apis::router())
        .merge(directory_apis::router())
}

/// Status code for a failed service call
pub(crate) fn status_for(error: &anyhow::Error) -> StatusCode {
    match error.downcast_ref::<DirectoryError>() {
        Some(DirectoryError::FamilyNotFound(_)) | Some(DirectoryError::FeeNotFound(_)) => StatusCode::NOT_FOUND,
        Some(DirectoryError::DuplicateFamilyId(_)) => StatusCode::CONFLICT,
        Some(DirectoryError::EmptyFamilyId) => StatusCode::BAD_REQUEST,
        Some(DirectoryError::LockPoisoned) | None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_response(action: &str, error: anyhow::Error) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        error!("Failed to {}: {:#}", action, error);
    } else {
        warn!("Failed to {}: {}", action, error);
    }
    (status, error.to_string()).into_response()
}

pub(crate) fn bad_request(message: impl Into<String>) -> Response {
    let message = message.into();
    warn!("Rejected request: {}", message);
    (StatusCode::BAD_REQUEST, message).into_response()
}

/// Amounts must be finite and not negative
pub(crate) fn valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount >= 0.0
}
