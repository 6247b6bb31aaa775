use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use matchbook_core::{Order, OrderType, Price, Side, SymbolBook};

fn limit(id: u64, ts: u64, cents: u64, qty: u64) -> Order {
    Order::new(id, OrderType::Limit, ts, Price::from_hundredths(cents), qty)
}

fn bench_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for &num_orders in [100, 1_000, 10_000].iter() {
        group.bench_with_input(
            BenchmarkId::new("non_crossing", num_orders),
            &num_orders,
            |b, &num_orders| {
                b.iter(|| {
                    let mut book = SymbolBook::new("AAPL".parse().unwrap());
                    let mut events = Vec::new();
                    for i in 0..num_orders {
                        let (side, cents) = if i % 2 == 0 {
                            (Side::Buy, 10_000 - i)
                        } else {
                            (Side::Sell, 10_100 + i)
                        };
                        book.admit(limit(i, i, cents, 100), side, &mut events)
                            .expect("capacity");
                    }
                    black_box(events.len())
                })
            },
        );
    }

    group.finish();
}

fn bench_match_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_loop");

    for &depth in [10, 100, 1_000].iter() {
        group.bench_with_input(
            BenchmarkId::new("crossed_book", depth),
            &depth,
            |b, &depth| {
                b.iter_batched(
                    || {
                        let mut book = SymbolBook::new("AAPL".parse().unwrap());
                        let mut events = Vec::new();
                        for i in 0..depth {
                            book.admit(limit(i, i, 10_000 + i, 100), Side::Sell, &mut events)
                                .expect("capacity");
                            book.admit(
                                limit(i + depth, i, 11_000 + i, 100),
                                Side::Buy,
                                &mut events,
                            )
                            .expect("capacity");
                        }
                        book
                    },
                    |mut book| {
                        let mut events = Vec::new();
                        book.run_match(u64::MAX, &mut events);
                        black_box(events.len())
                    },
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_inserts, bench_match_loop);
criterion_main!(benches);
