use axum::Router;

pub mod admin;
pub mod menu;
pub mod orders;
pub mod reports;
pub mod stock;
pub mod system;

/// Router for every back-office endpoint except `/health`.
pub fn router() -> Router {
    Router::new()
        .nest("/menu", menu::router())
        .nest("/orders", orders::router())
        .nest("/stock", stock::router())
        .nest("/reports", reports::router())
        .merge(reports::dashboard_router())
        .nest("/admin", admin::router())
}
