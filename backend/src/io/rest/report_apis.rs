//! # REST API for Fee Reports
//!
//! The consolidated report as JSON, or as a CSV download.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::Utc;
use log::info;

use shared::SearchQuery;

use super::error_response;
use crate::AppState;

/// Create a router for report related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/fees", get(get_fee_report))
        .route("/fees/csv", get(export_fee_report_csv))
}

pub async fn get_fee_report(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> impl IntoResponse {
    info!("GET /api/reports/fees - query: {:?}", query);

    let q = query.q.unwrap_or_default();
    match state.fee_service.fee_report(&q) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => error_response("build fee report", e),
    }
}

pub async fn export_fee_report_csv(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    info!("GET /api/reports/fees/csv - query: {:?}", query);

    let q = query.q.unwrap_or_default();
    match state.fee_service.fee_report_csv(&q) {
        Ok(csv) => {
            let disposition = format!("attachment; filename=\"fee_report_{}.csv\"", Utc::now().format("%Y%m%d"));
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                csv,
            )
                .into_response()
        }
        Err(e) => error_response("export fee report", e),
    }
}
