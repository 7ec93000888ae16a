//! # REST API for Daily Summaries

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Local;
use serde::Deserialize;
use tracing::info;

use super::failure;
use crate::domain::TimeWindow;
use crate::error::ApiError;
use crate::AppState;

/// Query parameters for GET /api/data
#[derive(Debug, Deserialize)]
pub struct DailySummaryQuery {
    pub days: Option<String>,
}

/// Per-day feeding volume, diaper and bowel counts over the last `days` days
pub async fn get_daily_summary(
    State(state): State<AppState>,
    Query(query): Query<DailySummaryQuery>,
) -> Response {
    info!("GET /api/data - query: {:?}", query);

    let Some(days) = query.days.as_deref().and_then(|raw| raw.trim().parse::<i64>().ok()) else {
        return ApiError::BadRequest("Invalid days parameter".to_string()).into_response();
    };

    let window = match TimeWindow::last_days(days) {
        Ok(window) => window,
        Err(e) => return ApiError::from(e).into_response(),
    };

    match state.care_log_service.daily_summary(window, &Local::now()).await {
        Ok(summary) => (StatusCode::OK, Json(summary.to_response())).into_response(),
        Err(e) => failure("Failed to build daily summary", e),
    }
}
