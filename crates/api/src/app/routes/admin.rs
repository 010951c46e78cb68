//! Operational endpoints: read-model rebuild and the live event feed.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::app::errors;
use crate::app::services::{self, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/rebuild", post(rebuild_projections))
        .route("/events", get(stream_events))
}

/// POST /admin/rebuild
pub async fn rebuild_projections(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.rebuild_projections() {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "rebuilt": ["menu.catalog", "stock.ledger", "orders.list"],
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

/// GET /admin/events (server-sent events, one per committed domain event)
pub async fn stream_events(
    Extension(services): Extension<Arc<AppServices>>,
) -> impl IntoResponse {
    services::event_sse_stream(services)
}
