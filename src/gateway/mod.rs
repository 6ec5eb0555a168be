//! HTTP surface: query, ingest, delete, health.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod tests;

pub use error::{ErrorResponse, GatewayError};
pub use payload::{DeleteResponse, HealthResponse, IngestRequest};
pub use state::GatewayState;

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the service router.
pub fn create_router(state: GatewayState) -> Router {
    Router::new()
        .route("/v1/query", post(handler::query_handler))
        .route("/v1/documents", post(handler::ingest_handler))
        .route("/v1/documents/{id}", delete(handler::delete_document_handler))
        .route("/healthz", get(handler::healthz_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
