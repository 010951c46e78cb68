use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use warung_orders::{OrderStatus, PaymentStatus};
use warung_stock::StockLevel;

use crate::record::{OrderRecord, StockRecord};

/// Number of recent orders shown when no limit is configured.
pub const DEFAULT_RECENT_ORDERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentOrder {
    pub order_no: String,
    pub customer_name: String,
    pub table_number: String,
    pub total: u64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    /// Non-cancelled orders placed today.
    pub today_orders: u64,
    /// Paid orders placed today.
    pub today_revenue: u64,
    /// Stock items at critical level.
    pub low_stock_items: u64,
    /// Distinct customer names among today's orders.
    pub total_customers: u64,
    pub recent_orders: Vec<RecentOrder>,
}

/// Front-page snapshot for `today`.
pub fn dashboard(
    orders: &[OrderRecord],
    stock: &[StockRecord],
    today: NaiveDate,
    recent_limit: usize,
) -> Dashboard {
    let todays: Vec<&OrderRecord> = orders
        .iter()
        .filter(|o| o.created_on() == today && o.status != OrderStatus::Cancelled)
        .collect();

    let today_revenue = todays
        .iter()
        .filter(|o| o.payment_status == PaymentStatus::Paid)
        .fold(0u64, |acc, o| acc.saturating_add(o.total));

    let customers: HashSet<String> = todays
        .iter()
        .map(|o| o.customer_name.trim().to_lowercase())
        .collect();

    let mut recent: Vec<&OrderRecord> = orders.iter().collect();
    recent.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.order_no.cmp(&a.order_no))
    });

    Dashboard {
        date: today,
        today_orders: todays.len() as u64,
        today_revenue,
        low_stock_items: stock
            .iter()
            .filter(|s| s.level == StockLevel::Critical)
            .count() as u64,
        total_customers: customers.len() as u64,
        recent_orders: recent
            .into_iter()
            .take(recent_limit)
            .map(|o| RecentOrder {
                order_no: o.order_no.clone(),
                customer_name: o.customer_name.clone(),
                table_number: o.table_number.clone(),
                total: o.total,
                status: o.status,
                payment_status: o.payment_status,
                created_at: o.created_at,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sales::tests::{at, line, paid, unpaid};
    use warung_menu::MenuItemId;
    use warung_orders::PaymentMethod;

    fn stock(name: &str, level: StockLevel) -> StockRecord {
        StockRecord {
            name: name.to_string(),
            level,
        }
    }

    #[test]
    fn counts_only_today_and_skips_cancelled() {
        let id = MenuItemId::generate();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let mut repeat = paid(3, at(2026, 10, 18, 12), PaymentMethod::Card, vec![line(id, "Lumpia", 12000, 1)]);
        repeat.customer_name = "tamu 1".to_string();

        let orders = vec![
            paid(1, at(2026, 10, 18, 9), PaymentMethod::Cash, vec![line(id, "Lumpia", 12000, 2)]),
            unpaid(2, at(2026, 10, 18, 10), OrderStatus::Cooking),
            repeat,
            unpaid(4, at(2026, 10, 18, 11), OrderStatus::Cancelled),
            paid(5, at(2026, 10, 17, 20), PaymentMethod::Cash, vec![line(id, "Lumpia", 12000, 1)]),
        ];
        let stock = vec![
            stock("Teh Celup", StockLevel::Critical),
            stock("Ayam", StockLevel::Low),
            stock("Beras", StockLevel::Good),
        ];

        let d = dashboard(&orders, &stock, today, DEFAULT_RECENT_ORDERS);
        assert_eq!(d.today_orders, 3);
        assert_eq!(d.today_revenue, 36000);
        assert_eq!(d.low_stock_items, 1);
        // "Tamu 1" and "tamu 1" are the same guest.
        assert_eq!(d.total_customers, 2);
    }

    #[test]
    fn recent_orders_are_newest_first_and_limited() {
        let orders: Vec<OrderRecord> = (1..=7)
            .map(|n| unpaid(n, at(2026, 10, 18, n as u32), OrderStatus::Pending))
            .collect();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        let d = dashboard(&orders, &[], today, DEFAULT_RECENT_ORDERS);
        let numbers: Vec<&str> = d.recent_orders.iter().map(|o| o.order_no.as_str()).collect();
        assert_eq!(numbers, vec!["ORD007", "ORD006", "ORD005", "ORD004", "ORD003"]);
    }
}
