use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};

use warung_infra::services::OrderRequestLine;
use warung_orders::{OrderId, OrderStatus, PaymentMethod};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id/status", patch(advance_status))
        .route("/:id/payment", post(apply_payment))
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateOrderRequest>,
) -> axum::response::Response {
    let mut lines = Vec::with_capacity(body.items.len());
    for item in &body.items {
        let menu_item_id = match errors::parse_id(&item.menu_item_id, "menu item") {
            Ok(v) => v,
            Err(res) => return res,
        };
        lines.push(OrderRequestLine {
            menu_item_id,
            quantity: item.quantity,
        });
    }

    match services
        .ledger
        .create_order(&body.customer_name, &body.table_number, &lines)
    {
        Ok(rm) => (StatusCode::CREATED, Json(dto::order_to_json(rm))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::OrdersQuery>,
) -> axum::response::Response {
    let status = match dto::parse_optional::<OrderStatus>(q.status.as_deref()) {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let orders: Vec<_> = services
        .ledger
        .list_orders(status)
        .into_iter()
        .map(dto::order_to_json)
        .collect();

    (StatusCode::OK, Json(orders)).into_response()
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id: OrderId = match errors::parse_id(&id, "order") {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.ledger.order(&order_id) {
        Some(rm) => (StatusCode::OK, Json(dto::order_to_json(rm))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
    }
}

pub async fn advance_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdvanceStatusRequest>,
) -> axum::response::Response {
    let order_id: OrderId = match errors::parse_id(&id, "order") {
        Ok(v) => v,
        Err(res) => return res,
    };
    let target: OrderStatus = match body.status.parse() {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.ledger.advance_status(order_id, target) {
        Ok(rm) => (StatusCode::OK, Json(dto::order_to_json(rm))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn apply_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PaymentRequest>,
) -> axum::response::Response {
    let order_id: OrderId = match errors::parse_id(&id, "order") {
        Ok(v) => v,
        Err(res) => return res,
    };
    let method: PaymentMethod = match body.method.parse() {
        Ok(m) => m,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.ledger.apply_payment(order_id, method) {
        Ok(rm) => (StatusCode::OK, Json(dto::order_to_json(rm))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
