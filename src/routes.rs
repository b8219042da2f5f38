//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{hash}`  - Short link redirect (public)
//! - `GET  /health`  - Health check: store, click queue (public)
//! - `/api/*`        - REST API (bearer token required except creation)
//!
//! # Middleware
//!
//! - **Tracing** - structured request/response logging
//! - **Rate limiting** - per-IP token bucket, applied inside the API router
//! - **Authentication** - bearer token layers on the API routes

use axum::Router;
use axum::routing::get;

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
///
/// Trailing-slash normalization is applied by the caller (see
/// [`crate::server::run`]) so the router itself stays directly drivable in
/// tests.
pub fn app_router(state: AppState) -> Router {
    let api_router = api::routes::api_routes(state.clone());

    Router::new()
        .route("/{hash}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}
