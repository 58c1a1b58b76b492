//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for the bank, client and collaborator ledgers
//! - Query validation
//! - Response types and the JSON error body

pub mod error;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tally_core::ledger::LedgerService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ledger report service.
    pub ledger: Arc<LedgerService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
