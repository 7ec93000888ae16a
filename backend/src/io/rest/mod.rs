//! # REST API Interface Layer
//!
//! HTTP endpoints for the care log:
//!
//! - `GET /completed-items` today's events
//! - `POST /completed-items` log an event
//! - `DELETE /completed-items?id=<int>` remove an event
//! - `GET /api/data?days=<int>` per-day counters for the charts
//!
//! Handlers translate domain errors into status codes: refused input becomes
//! 400, anything else 500 with the underlying error text.

use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::{ApiError, DomainError};

pub mod care_event_apis;
pub mod summary_apis;

pub use care_event_apis::*;
pub use summary_apis::*;

/// Turn a domain failure into a response, logging it unless the caller was at fault
fn failure(context: &str, err: DomainError) -> Response {
    if !err.is_client_error() {
        error!("{}: {}", context, err);
    }
    ApiError::from(err).into_response()
}
