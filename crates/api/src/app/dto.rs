use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use warung_core::DomainError;
use warung_infra::projections::{MenuItemReadModel, OrderReadModel};
use warung_infra::services::StockItemView;
use warung_menu::{MenuCategory, MenuItemDetails};
use warung_reports::DateRange;
use warung_stock::{StockCategory, StockItemDetails};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct MenuItemRequest {
    pub name: String,
    pub category: String,
    pub price: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stock: u32,
}

impl MenuItemRequest {
    pub fn into_details(self) -> Result<MenuItemDetails, DomainError> {
        Ok(MenuItemDetails {
            category: self.category.parse::<MenuCategory>()?,
            name: self.name,
            price: self.price,
            description: self.description,
            stock: self.stock,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub available: bool,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub menu_item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub table_number: String,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub method: String,
}

#[derive(Debug, Deserialize)]
pub struct StockItemRequest {
    pub name: String,
    pub category: String,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
    pub unit: String,
    #[serde(default)]
    pub cost: u64,
    #[serde(default)]
    pub supplier: String,
}

impl StockItemRequest {
    pub fn into_details(self) -> Result<StockItemDetails, DomainError> {
        Ok(StockItemDetails {
            category: self.category.parse::<StockCategory>()?,
            name: self.name,
            current_stock: self.current_stock,
            min_stock: self.min_stock,
            unit: self.unit,
            cost: self.cost,
            supplier: self.supplier,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub amount: Decimal,
}

// -------------------------
// Query strings
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl RangeQuery {
    pub fn range(&self) -> Result<DateRange, DomainError> {
        DateRange::new(self.from, self.to)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub period: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopItemsQuery {
    pub limit: Option<usize>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub date: Option<NaiveDate>,
}

/// Treat `?category=` and `?category=all` as no filter.
pub fn parse_optional<T>(raw: Option<&str>) -> Result<Option<T>, DomainError>
where
    T: core::str::FromStr<Err = DomainError>,
{
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(v) => v.parse().map(Some),
    }
}

// -------------------------
// Response mapping
// -------------------------

pub fn menu_item_to_json(rm: MenuItemReadModel) -> JsonValue {
    json!({
        "id": rm.id.to_string(),
        "name": rm.name,
        "category": rm.category,
        "price": rm.price,
        "description": rm.description,
        "stock": rm.stock,
        "available": rm.available,
        "updated_at": rm.updated_at.to_rfc3339(),
    })
}

pub fn order_to_json(rm: OrderReadModel) -> JsonValue {
    let lines: Vec<JsonValue> = rm
        .lines
        .iter()
        .map(|l| {
            json!({
                "line_no": l.line_no,
                "menu_item_id": l.menu_item_id.to_string(),
                "name": l.name,
                "category": l.category,
                "unit_price": l.unit_price,
                "quantity": l.quantity,
                "subtotal": l.subtotal(),
            })
        })
        .collect();

    json!({
        "id": rm.id.to_string(),
        "order_no": rm.order_no,
        "customer_name": rm.customer_name,
        "table_number": rm.table_number,
        "items": lines,
        "total": rm.total,
        "status": rm.status,
        "payment_status": rm.payment_status,
        "payment_method": rm.payment_method,
        "created_at": rm.created_at.to_rfc3339(),
        "paid_at": rm.paid_at.map(|t| t.to_rfc3339()),
    })
}

pub fn stock_item_to_json(view: StockItemView) -> JsonValue {
    let rm = view.item;
    json!({
        "id": rm.id.to_string(),
        "name": rm.name,
        "category": rm.category,
        "current_stock": rm.current_stock,
        "min_stock": rm.min_stock,
        "unit": rm.unit,
        "cost": rm.cost,
        "supplier": rm.supplier,
        "status": view.level,
        "last_updated": rm.last_updated.to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use warung_orders::OrderStatus;

    #[test]
    fn blank_and_all_mean_no_filter() {
        assert_eq!(parse_optional::<MenuCategory>(None).unwrap(), None);
        assert_eq!(parse_optional::<MenuCategory>(Some("all")).unwrap(), None);
        assert_eq!(
            parse_optional::<OrderStatus>(Some("cooking")).unwrap(),
            Some(OrderStatus::Cooking)
        );
        assert!(parse_optional::<StockCategory>(Some("furniture")).is_err());
    }

    #[test]
    fn stock_request_accepts_numeric_quantities() {
        let req: StockItemRequest = serde_json::from_value(json!({
            "name": "Gula",
            "category": "ingredient",
            "current_stock": 25,
            "min_stock": "10.5",
            "unit": "kg",
        }))
        .unwrap();
        let details = req.into_details().unwrap();
        assert_eq!(details.current_stock, Decimal::from(25));
        assert_eq!(details.min_stock, Decimal::new(105, 1));
        assert_eq!(details.cost, 0);
    }
}
