//! # REST API for Care Events
//!
//! Endpoints for listing today's events, logging a new one and deleting one.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Local;
use serde::Deserialize;
use tracing::{debug, info};

use super::failure;
use crate::error::ApiError;
use crate::AppState;
use shared::CreateCompletedItemRequest;

/// Query parameters for DELETE /completed-items
#[derive(Debug, Deserialize)]
pub struct DeleteCompletedItemQuery {
    pub id: Option<String>,
}

/// List today's events, latest first
pub async fn list_completed_items(State(state): State<AppState>) -> Response {
    info!("GET /completed-items");

    match state.care_log_service.list_today(&Local::now()).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => failure("Failed to list today's events", e),
    }
}

/// Log a new event
pub async fn create_completed_item(
    State(state): State<AppState>,
    payload: Result<Json<CreateCompletedItemRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            debug!("Rejected POST /completed-items body: {}", rejection.body_text());
            return ApiError::BadRequest(rejection.body_text()).into_response();
        }
    };
    info!("POST /completed-items - request: {:?}", request);

    match state.care_log_service.record_event(request, &Local::now()).await {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => failure("Failed to record event", e),
    }
}

/// Delete an event by id. Deleting an id that does not exist also succeeds.
pub async fn delete_completed_item(
    State(state): State<AppState>,
    Query(query): Query<DeleteCompletedItemQuery>,
) -> Response {
    info!("DELETE /completed-items - query: {:?}", query);

    let Some(id) = query.id.as_deref().and_then(|raw| raw.trim().parse::<i64>().ok()) else {
        return ApiError::BadRequest("Invalid ID parameter".to_string()).into_response();
    };

    match state.care_log_service.delete_event(id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => failure("Failed to delete event", e),
    }
}
