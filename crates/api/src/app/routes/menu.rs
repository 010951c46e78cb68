use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use warung_infra::projections::MenuFilter;
use warung_menu::{MenuCategory, MenuItemId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/items", post(add_item).get(list_items))
        .route(
            "/items/:id",
            get(get_item).put(update_item).delete(remove_item),
        )
        .route("/items/:id/availability", post(set_availability))
}

pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::MenuItemRequest>,
) -> axum::response::Response {
    let details = match body.into_details() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.ledger.add_menu_item(details) {
        Ok(rm) => (StatusCode::CREATED, Json(dto::menu_item_to_json(rm))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::CatalogQuery>,
) -> axum::response::Response {
    let category = match dto::parse_optional::<MenuCategory>(q.category.as_deref()) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let items: Vec<_> = services
        .ledger
        .list_menu(&MenuFilter {
            search: q.search,
            category,
        })
        .into_iter()
        .map(dto::menu_item_to_json)
        .collect();

    (StatusCode::OK, Json(items)).into_response()
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id: MenuItemId = match errors::parse_id(&id, "menu item") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.menu_item(&item_id) {
        Some(rm) => (StatusCode::OK, Json(dto::menu_item_to_json(rm))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "menu item not found"),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::MenuItemRequest>,
) -> axum::response::Response {
    let item_id: MenuItemId = match errors::parse_id(&id, "menu item") {
        Ok(v) => v,
        Err(res) => return res,
    };
    let details = match body.into_details() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.ledger.update_menu_item(item_id, details) {
        Ok(rm) => (StatusCode::OK, Json(dto::menu_item_to_json(rm))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn remove_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id: MenuItemId = match errors::parse_id(&id, "menu item") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.remove_menu_item(item_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn set_availability(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::AvailabilityRequest>,
) -> axum::response::Response {
    let item_id: MenuItemId = match errors::parse_id(&id, "menu item") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.set_availability(item_id, body.available) {
        Ok(rm) => (StatusCode::OK, Json(dto::menu_item_to_json(rm))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
