//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /l/{hash}`     - Short link redirect
//! - `GET  /link/{hash}`  - Short link redirect (alias)
//! - `GET  /url/{hash}`   - Short link redirect (alias)
//! - `GET  /health`       - Health check
//! - `/api/link*`         - Link management API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/l/{hash}", get(redirect_handler))
        .route("/link/{hash}", get(redirect_handler))
        .route("/url/{hash}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::link_routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
