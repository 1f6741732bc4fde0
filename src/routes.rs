//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /click`   - Signed click redirect (public)
//! - `GET  /health`  - Health check: event queue (public)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{click_handler, health_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/click", get(click_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
