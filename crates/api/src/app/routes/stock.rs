use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use warung_infra::projections::StockFilter;
use warung_stock::{StockCategory, StockItemId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/items", post(register_item).get(list_items))
        .route("/low", get(low_stock))
        .route(
            "/items/:id",
            get(get_item).put(update_item).delete(remove_item),
        )
        .route("/items/:id/restock", post(restock))
        .route("/items/:id/consume", post(consume))
}

fn parse_item_id(raw: &str) -> Result<StockItemId, axum::response::Response> {
    errors::parse_id(raw, "stock item")
}

pub async fn register_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::StockItemRequest>,
) -> axum::response::Response {
    let details = match body.into_details() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.ledger.register_stock_item(details) {
        Ok(view) => (StatusCode::CREATED, Json(dto::stock_item_to_json(view))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::CatalogQuery>,
) -> axum::response::Response {
    let category = match dto::parse_optional::<StockCategory>(q.category.as_deref()) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let items: Vec<_> = services
        .ledger
        .list_stock(&StockFilter {
            search: q.search,
            category,
        })
        .into_iter()
        .map(dto::stock_item_to_json)
        .collect();

    (StatusCode::OK, Json(items)).into_response()
}

pub async fn low_stock(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let items: Vec<_> = services
        .ledger
        .low_stock()
        .into_iter()
        .map(dto::stock_item_to_json)
        .collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "count": items.len(),
            "items": items,
        })),
    )
        .into_response()
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id = match parse_item_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.stock_item(&item_id) {
        Some(view) => (StatusCode::OK, Json(dto::stock_item_to_json(view))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "stock item not found"),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::StockItemRequest>,
) -> axum::response::Response {
    let item_id = match parse_item_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let details = match body.into_details() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.ledger.update_stock_item(item_id, details) {
        Ok(view) => (StatusCode::OK, Json(dto::stock_item_to_json(view))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn remove_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id = match parse_item_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.remove_stock_item(item_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn restock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::AmountRequest>,
) -> axum::response::Response {
    let item_id = match parse_item_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.restock(item_id, body.amount) {
        Ok(view) => (StatusCode::OK, Json(dto::stock_item_to_json(view))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn consume(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::AmountRequest>,
) -> axum::response::Response {
    let item_id = match parse_item_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.consume(item_id, body.amount) {
        Ok(view) => (StatusCode::OK, Json(dto::stock_item_to_json(view))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
