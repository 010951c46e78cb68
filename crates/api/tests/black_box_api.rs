use reqwest::StatusCode;
use serde_json::{Value, json};

use warung_infra::config::Config;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, demo data loaded, bound to an ephemeral port.
        let config = Config {
            seed_demo: true,
            ..Config::default()
        };
        let app = warung_api::app::build_app(&config)
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn send(&self, method: reqwest::Method, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .request(method, self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(reqwest::Method::POST, path, body).await
    }

    async fn patch(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(reqwest::Method::PATCH, path, body).await
    }

    async fn menu_id(&self, name: &str) -> String {
        let (_, items) = self.get("/menu/items").await;
        items
            .as_array()
            .unwrap()
            .iter()
            .find(|i| i["name"] == name)
            .map(|i| i["id"].as_str().unwrap().to_string())
            .unwrap_or_else(|| panic!("menu item {name} not seeded"))
    }

    async fn stock_id(&self, name: &str) -> String {
        let (_, items) = self.get(&format!("/stock/items?search={name}")).await;
        items[0]["id"].as_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_public_and_ok() {
    let server = TestServer::spawn().await;
    let (status, body) = server.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn order_flow_from_menu_to_dashboard() {
    let server = TestServer::spawn().await;
    let gudeg = server.menu_id("Nasi Gudeg").await;
    let teh = server.menu_id("Es Teh Manis").await;

    let (status, order) = server
        .post(
            "/orders",
            json!({
                "customer_name": "Ahmad Rizki",
                "table_number": "5",
                "items": [
                    { "menu_item_id": gudeg, "quantity": 1 },
                    { "menu_item_id": teh, "quantity": 1 },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["order_no"], "ORD001");
    assert_eq!(order["total"], 33_000);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["payment_status"], "unpaid");
    let id = order["id"].as_str().unwrap().to_string();

    // No skipping straight to served.
    let (status, err) = server
        .patch(&format!("/orders/{id}/status"), json!({ "status": "served" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"], "invalid_transition");

    for next in ["cooking", "ready"] {
        let (status, body) = server
            .patch(&format!("/orders/{id}/status"), json!({ "status": next }))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], next);
    }

    let (status, paid) = server
        .post(&format!("/orders/{id}/payment"), json!({ "method": "cash" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["status"], "served");
    assert_eq!(paid["payment_status"], "paid");
    assert_eq!(paid["payment_method"], "cash");

    let (status, _) = server
        .post(&format!("/orders/{id}/payment"), json!({ "method": "card" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, listed) = server.get("/orders?status=served").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, report) = server.get("/reports?period=daily").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["totals"]["total_sales"], 33_000);
    assert_eq!(report["totals"]["total_orders"], 1);
    assert_eq!(report["summaries"][0]["total_items"], 2);

    let (_, payments) = server.get("/reports/payments").await;
    let cash = payments
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["method"] == "cash")
        .unwrap();
    assert_eq!(cash["revenue"], 33_000);

    let (_, top) = server.get("/reports/top-items?limit=1").await;
    assert_eq!(top.as_array().unwrap().len(), 1);

    let (status, dash) = server.get("/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dash["today_orders"], 1);
    assert_eq!(dash["today_revenue"], 33_000);
    assert_eq!(dash["low_stock_items"], 1);
    assert_eq!(dash["recent_orders"][0]["order_no"], "ORD001");
}

#[tokio::test]
async fn order_rejections_map_to_http_errors() {
    let server = TestServer::spawn().await;
    let jus = server.menu_id("Jus Jeruk").await;

    let (status, err) = server
        .post(
            "/orders",
            json!({ "customer_name": "Budi", "table_number": "2", "items": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation_error");

    let (status, err) = server
        .post(
            "/orders",
            json!({
                "customer_name": "Budi",
                "table_number": "2",
                "items": [{ "menu_item_id": "not-a-uuid", "quantity": 1 }],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "invalid_id");

    let (status, _) = server
        .post(&format!("/menu/items/{jus}/availability"), json!({ "available": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server
        .post(
            "/orders",
            json!({
                "customer_name": "Budi",
                "table_number": "2",
                "items": [{ "menu_item_id": jus, "quantity": 1 }],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, err) = server
        .get("/orders/0190b5a0-0000-7000-8000-000000000000")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "not_found");
}

#[tokio::test]
async fn menu_crud_round_trip() {
    let server = TestServer::spawn().await;

    let (status, err) = server
        .post(
            "/menu/items",
            json!({ "name": "Sate", "category": "dessert", "price": 20000 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation_error");

    let (status, created) = server
        .post(
            "/menu/items",
            json!({
                "name": "Sate Ayam",
                "category": "main",
                "price": 22000,
                "description": "Sate ayam bumbu kacang",
                "stock": 40,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["available"], true);
    let id = created["id"].as_str().unwrap().to_string();

    let (_, mains) = server.get("/menu/items?category=main&search=sate").await;
    assert_eq!(mains.as_array().unwrap().len(), 1);

    let (status, updated) = server
        .send(
            reqwest::Method::PUT,
            &format!("/menu/items/{id}"),
            json!({ "name": "Sate Ayam", "category": "main", "price": 24000, "stock": 35 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 24_000);

    let res = server
        .client
        .delete(server.url(&format!("/menu/items/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (status, _) = server.get(&format!("/menu/items/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stock_levels_follow_restock_and_consume() {
    let server = TestServer::spawn().await;

    let (status, low) = server.get("/stock/low").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(low["count"], 1);
    assert_eq!(low["items"][0]["name"], "Teh Celup");
    assert_eq!(low["items"][0]["status"], "critical");

    let teh = server.stock_id("Teh%20Celup").await;

    let (status, item) = server
        .post(&format!("/stock/items/{teh}/restock"), json!({ "amount": 10 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["current_stock"], "18");
    assert_eq!(item["status"], "low");

    let (status, err) = server
        .post(&format!("/stock/items/{teh}/consume"), json!({ "amount": 100 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "insufficient_stock");

    let (_, item) = server.get(&format!("/stock/items/{teh}")).await;
    assert_eq!(item["current_stock"], "18");

    let (status, _) = server
        .post(&format!("/stock/items/{teh}/consume"), json!({ "amount": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, beverages) = server.get("/stock/items?category=beverage").await;
    assert_eq!(beverages.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn rebuild_keeps_read_models_intact() {
    let server = TestServer::spawn().await;
    let (_, before) = server.get("/menu/items").await;

    let (status, _) = server.post("/admin/rebuild", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = server.get("/menu/items").await;
    assert_eq!(before, after);
}
