//! Sunleaf Naturals landing page library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Architecture
//!
//! - [`page::Page`] owns the cart and all page state, and mutates a
//!   [`host::Surface`] through a [`host::Scheduler`]
//! - [`document::Document`] is the in-memory surface; its changes become
//!   HTMX out-of-band fragments
//! - [`runtime`] runs the page on a single tokio task
//! - [`routes`] turns browser requests into page events

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod document;
pub mod effects;
pub mod error;
pub mod filters;
pub mod host;
pub mod notifications;
pub mod page;
pub mod render;
pub mod routes;
pub mod runtime;
pub mod scheduler;
pub mod state;

use std::path::Path;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
///
/// Static assets under `static_dir` are served at `/static`.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
