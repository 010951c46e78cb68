//! Read-only inputs for reporting.
//!
//! Reports take plain snapshots rather than aggregates so they can be fed from
//! any read model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use warung_menu::{MenuCategory, MenuItemId};
use warung_orders::{OrderStatus, PaymentMethod, PaymentStatus};
use warung_stock::StockLevel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub category: MenuCategory,
    pub unit_price: u64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_no: String,
    pub customer_name: String,
    pub table_number: String,
    pub lines: Vec<LineRecord>,
    pub total: u64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    /// Only served and paid orders count as sales.
    pub fn is_sale(&self) -> bool {
        self.status == OrderStatus::Served && self.payment_status == PaymentStatus::Paid
    }

    /// Calendar day of placement (UTC).
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub name: String,
    pub level: StockLevel,
}
