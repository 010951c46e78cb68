use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, TimeZone, Utc};
use warung_menu::{MenuCategory, MenuItemId};
use warung_orders::{OrderStatus, PaymentMethod, PaymentStatus};
use warung_reports::{DateRange, LineRecord, OrderRecord, ReportPeriod, aggregate, top_items};

fn order_log(count: usize) -> Vec<OrderRecord> {
    let menu: Vec<(MenuItemId, &str, u64)> = vec![
        (MenuItemId::generate(), "Nasi Gudeg", 25000),
        (MenuItemId::generate(), "Gado-gado", 20000),
        (MenuItemId::generate(), "Kerupuk Udang", 8000),
        (MenuItemId::generate(), "Es Teh Manis", 8000),
    ];
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();

    (0..count)
        .map(|i| {
            let (id, name, price) = menu[i % menu.len()];
            let quantity = (i % 3) as u32 + 1;
            let paid = i % 5 != 0;
            OrderRecord {
                order_no: format!("ORD{:03}", i + 1),
                customer_name: format!("Tamu {}", i % 40),
                table_number: format!("T{}", i % 12),
                lines: vec![LineRecord {
                    menu_item_id: id,
                    name: name.to_string(),
                    category: MenuCategory::Main,
                    unit_price: price,
                    quantity,
                }],
                total: price * u64::from(quantity),
                status: if paid { OrderStatus::Served } else { OrderStatus::Cancelled },
                payment_status: if paid { PaymentStatus::Paid } else { PaymentStatus::Unpaid },
                payment_method: paid.then_some(PaymentMethod::Cash),
                created_at: start + Duration::minutes(37 * i as i64),
            }
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_aggregate");
    for size in [1_000usize, 10_000, 100_000] {
        let orders = order_log(size);
        group.throughput(Throughput::Elements(size as u64));
        for period in [ReportPeriod::Daily, ReportPeriod::Weekly, ReportPeriod::Monthly] {
            group.bench_with_input(
                BenchmarkId::new(period.as_str(), size),
                &orders,
                |b, orders| b.iter(|| aggregate(black_box(orders), period, &DateRange::all())),
            );
        }
    }
    group.finish();
}

fn bench_top_items(c: &mut Criterion) {
    let orders = order_log(10_000);
    c.bench_function("top_items_10k", |b| {
        b.iter(|| top_items(black_box(&orders), &DateRange::all(), 10))
    });
}

criterion_group!(benches, bench_aggregate, bench_top_items);
criterion_main!(benches);
