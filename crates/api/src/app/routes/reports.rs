use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;

use warung_reports::{DateRange, ReportPeriod};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

const DEFAULT_TOP_ITEMS: usize = 5;

pub fn router() -> Router {
    Router::new()
        .route("/", get(sales_report))
        .route("/top-items", get(top_items))
        .route("/payments", get(payment_breakdown))
}

pub fn dashboard_router() -> Router {
    Router::new().route("/dashboard", get(dashboard))
}

/// GET /reports?period=daily|weekly|monthly&from=&to=
pub async fn sales_report(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::ReportQuery>,
) -> axum::response::Response {
    let period = match q.period.as_deref().map(str::parse::<ReportPeriod>) {
        None => ReportPeriod::Daily,
        Some(Ok(p)) => p,
        Some(Err(e)) => return errors::domain_error_to_response(e),
    };
    let range = match DateRange::new(q.from, q.to) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let report = services.ledger.sales_report(period, range);
    (StatusCode::OK, Json(report)).into_response()
}

/// GET /reports/top-items?limit=&from=&to=
pub async fn top_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::TopItemsQuery>,
) -> axum::response::Response {
    let range = match DateRange::new(q.from, q.to) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let limit = q.limit.unwrap_or(DEFAULT_TOP_ITEMS);

    let items = services.ledger.top_items(&range, limit);
    (StatusCode::OK, Json(items)).into_response()
}

/// GET /reports/payments?from=&to=
pub async fn payment_breakdown(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::RangeQuery>,
) -> axum::response::Response {
    let range = match q.range() {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let breakdown = services.ledger.payment_breakdown(&range);
    (StatusCode::OK, Json(breakdown)).into_response()
}

/// GET /dashboard?date=YYYY-MM-DD (defaults to today, UTC)
pub async fn dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::DashboardQuery>,
) -> axum::response::Response {
    let today = q.date.unwrap_or_else(|| Utc::now().date_naive());
    (StatusCode::OK, Json(services.ledger.dashboard(today))).into_response()
}
