//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: ledger construction and the live event feed
//! - `routes/`: HTTP routes + handlers (one file per back-office area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use warung_infra::config::Config;
use warung_infra::services::LedgerError;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
///
/// Must be called from within a Tokio runtime.
pub async fn build_app(config: &Config) -> Result<Router, LedgerError> {
    let services = Arc::new(services::build_services(config)?);
    Ok(router(services))
}

/// Router over already-built services.
pub fn router(services: Arc<services::AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
