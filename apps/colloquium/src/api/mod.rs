//! # Schedule Server
//!
//! Serves the schedule page and the documents behind it using axum.
//!
//! ## Endpoints
//!
//! - `GET /` - Schedule page (query: `filter=future|past|all`, `order=asc|desc`)
//! - `GET /presentations.json` - The meeting registry
//! - `GET /config.json` - The site config
//! - `GET /next-meeting` - Next-meeting notice
//! - `GET /health` - Health check
//!
//! Every route is a same-origin GET, so the only layer is request tracing.

mod handlers;
mod types;

pub use handlers::{
    health_handler, next_meeting_handler, page_handler, registry_handler, site_config_handler,
};
pub use types::{ErrorResponse, HealthResponse, NextMeetingResponse, PageQuery};

use crate::error::AppError;
use axum::{Router, routing::get};
use chrono::NaiveDateTime;
use colloquium_core::{Registry, SiteConfig};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Read-only state shared by all handlers. Loaded once at startup.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub site: Arc<SiteConfig>,
    pub title: Arc<str>,
    /// Pins "now" (for `--now` and tests); the local clock otherwise.
    pub fixed_now: Option<NaiveDateTime>,
}

impl AppState {
    #[must_use]
    pub fn new(registry: Registry, site: SiteConfig, title: &str) -> Self {
        Self {
            registry: Arc::new(registry),
            site: Arc::new(site),
            title: Arc::from(title),
            fixed_now: None,
        }
    }

    #[must_use]
    pub fn with_fixed_now(mut self, now: Option<NaiveDateTime>) -> Self {
        self.fixed_now = now;
        self
    }

    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        self.fixed_now
            .unwrap_or_else(|| chrono::Local::now().naive_local())
    }
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the router with all endpoints and request tracing.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::page_handler))
        .route("/presentations.json", get(handlers::registry_handler))
        .route("/config.json", get(handlers::site_config_handler))
        .route("/next-meeting", get(handlers::next_meeting_handler))
        .route("/health", get(handlers::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Serve until Ctrl+C.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), AppError> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Schedule server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Cannot listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
        .map_err(|e| AppError::Io(format!("Server error: {}", e)))
}
