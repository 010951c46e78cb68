use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::Utc;
use rust_decimal::Decimal;
use warung_infra::config::Config;
use warung_infra::projections::{MenuFilter, StockFilter};
use warung_infra::services::{Ledger, OrderRequestLine, seed_demo};
use warung_menu::MenuItemId;
use warung_orders::{OrderStatus, PaymentMethod};
use warung_stock::StockItemId;

fn seeded() -> Ledger {
    let ledger = Ledger::new(&Config::default());
    seed_demo(&ledger).unwrap();
    ledger
}

fn menu_ids(ledger: &Ledger) -> Vec<MenuItemId> {
    ledger
        .list_menu(&MenuFilter::default())
        .into_iter()
        .map(|m| m.id)
        .collect()
}

fn first_stock_id(ledger: &Ledger) -> StockItemId {
    ledger.list_stock(&StockFilter::default())[0].item.id
}

/// Place and settle `n` orders spread over the demo menu.
fn with_orders(n: usize) -> Ledger {
    let ledger = seeded();
    let menu = menu_ids(&ledger);
    for i in 0..n {
        let lines = [
            OrderRequestLine {
                menu_item_id: menu[i % menu.len()],
                quantity: 1 + (i % 3) as u32,
            },
            OrderRequestLine {
                menu_item_id: menu[(i + 2) % menu.len()],
                quantity: 1,
            },
        ];
        let order = ledger
            .create_order(&format!("Pelanggan {i}"), &format!("{}", i % 12 + 1), &lines)
            .unwrap();
        ledger.advance_status(order.id, OrderStatus::Cooking).unwrap();
        ledger.advance_status(order.id, OrderStatus::Ready).unwrap();
        let method = if i % 2 == 0 {
            PaymentMethod::Cash
        } else {
            PaymentMethod::Card
        };
        ledger.apply_payment(order.id, method).unwrap();
    }
    ledger
}

fn bench_command_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("command_latency");

    group.bench_function("create_order", |b| {
        let ledger = seeded();
        let menu = menu_ids(&ledger);
        let lines = [OrderRequestLine {
            menu_item_id: menu[0],
            quantity: 2,
        }];
        b.iter(|| black_box(ledger.create_order("Ahmad", "5", &lines).unwrap()));
    });

    // Each consume rehydrates the whole stream, so latency grows with history.
    for history in [10usize, 100, 1_000] {
        group.bench_with_input(
            BenchmarkId::new("consume_with_history", history),
            &history,
            |b, &history| {
                let ledger = seeded();
                let item = first_stock_id(&ledger);
                ledger
                    .restock(item, Decimal::from(1_000_000))
                    .unwrap();
                for _ in 0..history {
                    ledger.consume(item, Decimal::ONE).unwrap();
                }
                b.iter(|| black_box(ledger.consume(item, Decimal::ONE).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_projection_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection_rebuild");
    group.sample_size(20);

    for orders in [100usize, 1_000] {
        let ledger = with_orders(orders);
        group.throughput(Throughput::Elements(orders as u64));
        group.bench_with_input(BenchmarkId::from_parameter(orders), &orders, |b, _| {
            b.iter(|| ledger.rebuild_projections().unwrap());
        });
    }

    group.finish();
}

fn bench_reports(c: &mut Criterion) {
    let mut group = c.benchmark_group("reports");
    let ledger = with_orders(1_000);
    let today = Utc::now().date_naive();

    group.bench_function("dashboard", |b| {
        b.iter(|| black_box(ledger.dashboard(today)));
    });
    group.bench_function("daily_report", |b| {
        b.iter(|| {
            black_box(ledger.sales_report(
                warung_reports::ReportPeriod::Daily,
                warung_reports::DateRange::all(),
            ))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_command_latency,
    bench_projection_rebuild,
    bench_reports
);
criterion_main!(benches);
