//! # Baby Tracker Backend
//!
//! Server of the baby-activity logger. It records timestamped activities
//! (sleep, feed, diaper, medicine, weight, notes) in SQLite and serves both the
//! JSON API and the page that drives it.
//!
//! ## Architecture
//!
//! ```text
//! Page (server-rendered HTML + script)
//!     ↓
//! IO Layer (axum handlers, DTO mapping)
//!     ↓
//! Domain Layer (event service, display formatting)
//!     ↓
//! Storage Layer (SQLite via sqlx)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::BackendConfig;
use crate::domain::{ActivityDisplayService, Clock, EventService, SystemClock};
use crate::storage::DbConnection;

/// Main application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub event_service: EventService<DbConnection>,
    pub activity_display_service: ActivityDisplayService,
    pub recent_limit: u32,
}

/// Open the database and wire up the services
pub async fn initialize_backend(config: &BackendConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db_conn = DbConnection::new(&config.database_url).await?;

    info!("Setting up domain model");
    Ok(build_app_state(db_conn, config, Arc::new(SystemClock)))
}

pub fn build_app_state(db_conn: DbConnection, config: &BackendConfig, clock: Arc<dyn Clock>) -> AppState {
    AppState {
        event_service: EventService::with_reset_hour(Arc::new(db_conn), clock, config.reset_hour),
        activity_display_service: ActivityDisplayService::with_config(config.display_config()),
        recent_limit: config.recent_limit,
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &BackendConfig) -> Router {
    let api_routes = Router::new()
        .route(
            "/events",
            get(io::get_status)
                .post(io::log_event)
                .delete(io::delete_event)
                .patch(io::update_event),
        )
        .route("/events/recent", get(io::list_recent))
        .route("/events/:id", get(io::get_event))
        .route("/logs", post(io::log_message));

    let router = Router::new()
        .route("/", get(io::index))
        .route("/health", get(io::health))
        .nest("/api", api_routes);

    let router = match cors_layer(config) {
        Ok(Some(cors)) => router.layer(cors),
        Ok(None) => router,
        Err(e) => {
            tracing::warn!("CORS disabled: {:#}", e);
            router
        }
    };

    router.with_state(app_state)
}

fn cors_layer(config: &BackendConfig) -> Result<Option<CorsLayer>> {
    let Some(origin) = &config.cors_origin else {
        return Ok(None);
    };
    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("Invalid cors_origin: {}", origin))?;

    Ok(Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers(Any),
    ))
}
