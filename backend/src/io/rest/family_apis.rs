//! # REST API for Family Records
//!
//! Search, read, add, update and delete families, plus each family's fee
//! breakdown.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;

use shared::{
    DeleteFamilyResponse, Family, FamilyListResponse, FamilyResponse, SearchQuery, UpdateFamilyRequest,
};

use super::{bad_request, error_response};
use crate::domain::commands::family::UpdateFamilyCommand;
use crate::AppState;

/// Create a router for family related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_families).post(add_family))
        .route("/:id", get(get_family).put(update_family).delete(delete_family))
        .route("/:id/finances", get(get_family_finances))
}

/// Search families; an empty or absent query lists everyone
pub async fn search_families(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    info!("GET /api/families - query: {:?}", query);

    let q = query.q.unwrap_or_default();
    match state.family_service.search_families(&q) {
        Ok(families) => (StatusCode::OK, Json(FamilyListResponse { families })).into_response(),
        Err(e) => error_response("search families", e),
    }
}

pub async fn get_family(State(state): State<AppState>, Path(family_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/families/{}", family_id);

    match state.family_service.get_family(&family_id) {
        Ok(Some(family)) => (StatusCode::OK, Json(family)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Family not found").into_response(),
        Err(e) => error_response("get family", e),
    }
}

pub async fn add_family(State(state): State<AppState>, Json(family): Json<Family>) -> impl IntoResponse {
    info!("POST /api/families - id: {}", family.id);

    match state.family_service.add_family(family) {
        Ok(result) => (
            StatusCode::CREATED,
            Json(FamilyResponse {
                family: result.family,
                success_message: result.success_message,
            }),
        )
            .into_response(),
        Err(e) => error_response("add family", e),
    }
}

pub async fn update_family(
    State(state): State<AppState>,
    Path(family_id): Path<String>,
    Json(request): Json<UpdateFamilyRequest>,
) -> impl IntoResponse {
    info!("PUT /api/families/{}", family_id);

    if family_id.trim().is_empty() {
        return bad_request("Family id is required");
    }

    let command = UpdateFamilyCommand {
        family_id,
        primary_member: request.primary_member,
        address: request.address,
        family_members: request.family_members,
    };

    match state.family_service.update_family(command) {
        Ok(result) => (
            StatusCode::OK,
            Json(FamilyResponse {
                family: result.family,
                success_message: result.success_message,
            }),
        )
            .into_response(),
        Err(e) => error_response("update family", e),
    }
}

pub async fn delete_family(State(state): State<AppState>, Path(family_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/families/{}", family_id);

    match state.family_service.delete_family(&family_id) {
        Ok(result) => (
            StatusCode::OK,
            Json(DeleteFamilyResponse {
                deleted: result.deleted,
                success_message: result.success_message,
            }),
        )
            .into_response(),
        Err(e) => error_response("delete family", e),
    }
}

pub async fn get_family_finances(
    State(state): State<AppState>,
    Path(family_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/families/{}/finances", family_id);

    match state.fee_service.get_family_finances(&family_id) {
        Ok(Some(summary)) => (StatusCode::OK, Json(summary)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Family not found").into_response(),
        Err(e) => error_response("get family finances", e),
    }
}
