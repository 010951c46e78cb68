//! Sales summaries, best sellers and payment breakdown.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use warung_menu::{MenuCategory, MenuItemId};
use warung_orders::PaymentMethod;

use crate::period::{DateRange, ReportPeriod};
use crate::record::OrderRecord;

/// The four headline figures, shared by buckets and grand totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesTotals {
    pub total_sales: u64,
    pub total_orders: u64,
    pub total_items: u64,
    /// `total_sales / total_orders`, truncated; 0 when there are no orders.
    pub average_order_value: u64,
}

impl SalesTotals {
    fn add(&mut self, order: &OrderRecord) {
        self.total_sales = self.total_sales.saturating_add(order.total);
        self.total_orders += 1;
        self.total_items = self.total_items.saturating_add(order.item_count());
    }

    fn finish(mut self) -> Self {
        self.average_order_value = self
            .total_sales
            .checked_div(self.total_orders)
            .unwrap_or(0);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: ReportPeriod,
    pub start: NaiveDate,
    pub label: String,
    #[serde(flatten)]
    pub totals: SalesTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    pub period: ReportPeriod,
    pub range: DateRange,
    pub summaries: Vec<PeriodSummary>,
    pub totals: SalesTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopItem {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub category: MenuCategory,
    pub quantity: u64,
    pub revenue: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub method: PaymentMethod,
    pub orders: u64,
    pub revenue: u64,
}

fn sales<'a>(
    orders: &'a [OrderRecord],
    range: &'a DateRange,
) -> impl Iterator<Item = &'a OrderRecord> + 'a {
    orders
        .iter()
        .filter(move |o| o.is_sale() && range.contains(o.created_on()))
}

/// Group served+paid orders into calendar buckets, ordered by bucket start.
pub fn aggregate(
    orders: &[OrderRecord],
    period: ReportPeriod,
    range: &DateRange,
) -> Vec<PeriodSummary> {
    let mut buckets: BTreeMap<NaiveDate, SalesTotals> = BTreeMap::new();
    for order in sales(orders, range) {
        buckets
            .entry(period.bucket_start(order.created_on()))
            .or_default()
            .add(order);
    }

    buckets
        .into_iter()
        .map(|(start, totals)| PeriodSummary {
            period,
            start,
            label: period.label(start),
            totals: totals.finish(),
        })
        .collect()
}

/// Headline figures over every qualifying order in range.
pub fn totals(orders: &[OrderRecord], range: &DateRange) -> SalesTotals {
    sales(orders, range)
        .fold(SalesTotals::default(), |mut acc, o| {
            acc.add(o);
            acc
        })
        .finish()
}

pub fn report(orders: &[OrderRecord], period: ReportPeriod, range: DateRange) -> SalesReport {
    SalesReport {
        period,
        range,
        summaries: aggregate(orders, period, &range),
        totals: totals(orders, &range),
    }
}

/// Best sellers by quantity, then revenue, then name.
pub fn top_items(orders: &[OrderRecord], range: &DateRange, limit: usize) -> Vec<TopItem> {
    let mut by_item: HashMap<MenuItemId, TopItem> = HashMap::new();
    for order in sales(orders, range) {
        for line in &order.lines {
            let entry = by_item.entry(line.menu_item_id).or_insert_with(|| TopItem {
                menu_item_id: line.menu_item_id,
                name: line.name.clone(),
                category: line.category,
                quantity: 0,
                revenue: 0,
            });
            entry.quantity += u64::from(line.quantity);
            entry.revenue = entry
                .revenue
                .saturating_add(line.unit_price.saturating_mul(u64::from(line.quantity)));
        }
    }

    let mut items: Vec<TopItem> = by_item.into_values().collect();
    items.sort_by(|a, b| {
        b.quantity
            .cmp(&a.quantity)
            .then(b.revenue.cmp(&a.revenue))
            .then_with(|| a.name.cmp(&b.name))
    });
    items.truncate(limit);
    items
}

/// Order count and revenue per payment method. Both methods are always listed.
pub fn payment_breakdown(orders: &[OrderRecord], range: &DateRange) -> Vec<PaymentBreakdown> {
    let mut rows: Vec<PaymentBreakdown> = [PaymentMethod::Cash, PaymentMethod::Card]
        .into_iter()
        .map(|method| PaymentBreakdown {
            method,
            orders: 0,
            revenue: 0,
        })
        .collect();

    for order in sales(orders, range) {
        let Some(method) = order.payment_method else {
            continue;
        };
        if let Some(row) = rows.iter_mut().find(|r| r.method == method) {
            row.orders += 1;
            row.revenue = row.revenue.saturating_add(order.total);
        }
    }
    rows
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::record::LineRecord;
    use chrono::{DateTime, TimeZone, Utc};
    use warung_orders::{OrderStatus, PaymentStatus};

    pub(crate) fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    pub(crate) fn line(id: MenuItemId, name: &str, price: u64, qty: u32) -> LineRecord {
        LineRecord {
            menu_item_id: id,
            name: name.to_string(),
            category: MenuCategory::Main,
            unit_price: price,
            quantity: qty,
        }
    }

    pub(crate) fn paid(
        no: u64,
        created_at: DateTime<Utc>,
        method: PaymentMethod,
        lines: Vec<LineRecord>,
    ) -> OrderRecord {
        let total = lines.iter().map(|l| l.unit_price * u64::from(l.quantity)).sum();
        OrderRecord {
            order_no: format!("ORD{no:03}"),
            customer_name: format!("Tamu {no}"),
            table_number: "A1".to_string(),
            lines,
            total,
            status: OrderStatus::Served,
            payment_status: PaymentStatus::Paid,
            payment_method: Some(method),
            created_at,
        }
    }

    pub(crate) fn unpaid(no: u64, created_at: DateTime<Utc>, status: OrderStatus) -> OrderRecord {
        let mut o = paid(
            no,
            created_at,
            PaymentMethod::Cash,
            vec![line(MenuItemId::generate(), "Lumpia", 12000, 1)],
        );
        o.status = status;
        o.payment_status = PaymentStatus::Unpaid;
        o.payment_method = None;
        o
    }

    #[test]
    fn empty_input_yields_no_buckets_and_zero_totals() {
        assert!(aggregate(&[], ReportPeriod::Daily, &DateRange::all()).is_empty());
        assert_eq!(totals(&[], &DateRange::all()), SalesTotals::default());
    }

    #[test]
    fn daily_buckets_with_truncated_average() {
        let gudeg = MenuItemId::generate();
        let teh = MenuItemId::generate();
        let orders = vec![
            paid(1, at(2026, 10, 17, 9), PaymentMethod::Cash, vec![
                line(gudeg, "Nasi Gudeg", 25000, 1),
                line(teh, "Es Teh Manis", 8000, 1),
            ]),
            paid(2, at(2026, 10, 17, 12), PaymentMethod::Card, vec![line(teh, "Es Teh Manis", 8000, 2)]),
            paid(3, at(2026, 10, 18, 8), PaymentMethod::Cash, vec![line(gudeg, "Nasi Gudeg", 25000, 1)]),
            unpaid(4, at(2026, 10, 18, 9), OrderStatus::Ready),
            unpaid(5, at(2026, 10, 18, 10), OrderStatus::Cancelled),
        ];

        let buckets = aggregate(&orders, ReportPeriod::Daily, &DateRange::all());
        assert_eq!(buckets.len(), 2);

        assert_eq!(buckets[0].label, "2026-10-17");
        assert_eq!(buckets[0].totals.total_sales, 49000);
        assert_eq!(buckets[0].totals.total_orders, 2);
        assert_eq!(buckets[0].totals.total_items, 4);
        assert_eq!(buckets[0].totals.average_order_value, 24500);

        assert_eq!(buckets[1].label, "2026-10-18");
        assert_eq!(buckets[1].totals.total_orders, 1);
        assert_eq!(buckets[1].totals.total_sales, 25000);
    }

    #[test]
    fn average_truncates_toward_zero() {
        let id = MenuItemId::generate();
        let orders = vec![
            paid(1, at(2026, 1, 5, 9), PaymentMethod::Cash, vec![line(id, "Lumpia", 10000, 1)]),
            paid(2, at(2026, 1, 5, 9), PaymentMethod::Cash, vec![line(id, "Lumpia", 10000, 1)]),
            paid(3, at(2026, 1, 5, 9), PaymentMethod::Cash, vec![line(id, "Kerupuk", 2, 1)]),
        ];
        // 20002 / 3 = 6667.33
        assert_eq!(totals(&orders, &DateRange::all()).average_order_value, 6667);
    }

    #[test]
    fn weekly_buckets_group_monday_to_sunday() {
        let id = MenuItemId::generate();
        let orders = vec![
            // Monday and Sunday of the same ISO week.
            paid(1, at(2026, 10, 12, 9), PaymentMethod::Cash, vec![line(id, "Lumpia", 12000, 1)]),
            paid(2, at(2026, 10, 18, 21), PaymentMethod::Cash, vec![line(id, "Lumpia", 12000, 1)]),
            // Following Monday.
            paid(3, at(2026, 10, 19, 9), PaymentMethod::Cash, vec![line(id, "Lumpia", 12000, 1)]),
        ];

        let buckets = aggregate(&orders, ReportPeriod::Weekly, &DateRange::all());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].start, NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
        assert_eq!(buckets[0].totals.total_orders, 2);
        assert_eq!(buckets[1].start, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    }

    #[test]
    fn monthly_buckets_respect_date_range() {
        let id = MenuItemId::generate();
        let orders = vec![
            paid(1, at(2026, 9, 30, 9), PaymentMethod::Cash, vec![line(id, "Lumpia", 12000, 1)]),
            paid(2, at(2026, 10, 1, 9), PaymentMethod::Cash, vec![line(id, "Lumpia", 12000, 1)]),
            paid(3, at(2026, 11, 1, 9), PaymentMethod::Cash, vec![line(id, "Lumpia", 12000, 1)]),
        ];
        let range = DateRange::new(NaiveDate::from_ymd_opt(2026, 9, 15), NaiveDate::from_ymd_opt(2026, 10, 31))
            .unwrap();

        let r = report(&orders, ReportPeriod::Monthly, range);
        let labels: Vec<&str> = r.summaries.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["2026-09", "2026-10"]);
        assert_eq!(r.totals.total_orders, 2);
        assert_eq!(r.totals.total_sales, 24000);
    }

    #[test]
    fn top_items_rank_by_quantity_then_revenue_then_name() {
        let gudeg = MenuItemId::generate();
        let teh = MenuItemId::generate();
        let lumpia = MenuItemId::generate();
        let kerupuk = MenuItemId::generate();
        let orders = vec![
            paid(1, at(2026, 10, 18, 9), PaymentMethod::Cash, vec![
                line(teh, "Es Teh Manis", 8000, 3),
                line(gudeg, "Nasi Gudeg", 25000, 2),
                line(lumpia, "Lumpia", 12000, 2),
                line(kerupuk, "Kerupuk Udang", 8000, 2),
            ]),
            unpaid(2, at(2026, 10, 18, 9), OrderStatus::Pending),
        ];

        let top = top_items(&orders, &DateRange::all(), 3);
        let names: Vec<&str> = top.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Es Teh Manis", "Nasi Gudeg", "Lumpia"]);
        assert_eq!(top[1].revenue, 50000);
        assert_eq!(top[0].quantity, 3);
    }

    #[test]
    fn payment_breakdown_lists_both_methods() {
        let id = MenuItemId::generate();
        let orders = vec![
            paid(1, at(2026, 10, 18, 9), PaymentMethod::Card, vec![line(id, "Lumpia", 12000, 1)]),
            paid(2, at(2026, 10, 18, 9), PaymentMethod::Card, vec![line(id, "Lumpia", 12000, 2)]),
            unpaid(3, at(2026, 10, 18, 9), OrderStatus::Cooking),
        ];

        let rows = payment_breakdown(&orders, &DateRange::all());
        assert_eq!(
            rows,
            vec![
                PaymentBreakdown { method: PaymentMethod::Cash, orders: 0, revenue: 0 },
                PaymentBreakdown { method: PaymentMethod::Card, orders: 2, revenue: 36000 },
            ]
        );
    }
}
