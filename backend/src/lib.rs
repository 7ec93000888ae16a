//! # Care Log Backend
//!
//! A small service for logging infant-care events (feedings, diaper changes,
//! bowel movements) and charting them per day.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST handlers)
//!     ↓
//! Domain Layer (time windows, daily aggregation, service)
//!     ↓
//! Storage Layer (SQLite via sqlx)
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod storage;

use std::path::Path;

use anyhow::Result;
use axum::{
    http::Method,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::domain::CareLogService;
use crate::storage::DbConnection;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub care_log_service: CareLogService,
}

/// Connect to the event store and build the services.
///
/// Fails if the store cannot be reached; the service has nothing to do without it.
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database");
    let db_conn = DbConnection::new(&config.database_url).await?;

    info!("Setting up application state");
    Ok(AppState {
        care_log_service: CareLogService::new(db_conn),
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, index_path: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route_service("/", ServeFile::new(index_path))
        .route(
            "/completed-items",
            get(io::list_completed_items)
                .post(io::create_completed_item)
                .delete(io::delete_completed_item),
        )
        .route("/api/data", get(io::get_daily_summary))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
