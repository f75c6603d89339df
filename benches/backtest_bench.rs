//! Performance benchmarks for the backtest engine.
//!
//! Run with: cargo bench

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;

use krill::backtest::run_strategy;
use krill::indicators::{Ema, Rsi, Sma};
use krill::optimizer::{optimize, OptimizerConfig};
use krill::strategies::{MeanReversion, MomentumCrossover};
use krill::types::{PriceBar, PriceSeries};

/// Generate a synthetic price series for benchmarking.
fn generate_prices(count: usize, base: i64) -> Vec<Decimal> {
    (0..count)
        .map(|i| {
            let noise = ((i as f64 * 0.7).sin() * 2.0 + (i as f64 * 1.3).cos()) * 0.5;
            let drift = i as f64 * 0.05;
            Decimal::new(base + ((noise + drift) * 100.0) as i64, 2)
        })
        .collect()
}

fn generate_basket(tickers: usize, days: usize) -> BTreeMap<String, PriceSeries> {
    let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0..tickers)
        .map(|t| {
            let name = format!("TICK{t}");
            let bars = generate_prices(days, 10_000 + 500 * t as i64)
                .into_iter()
                .enumerate()
                .map(|(i, p)| PriceBar::partial(start + chrono::Duration::days(i as i64), p))
                .collect();
            let series = PriceSeries::new(name.clone(), bars).unwrap();
            (name, series)
        })
        .collect()
}

fn bench_indicators(c: &mut Criterion) {
    let prices = generate_prices(1000, 10_000);

    let mut group = c.benchmark_group("indicators");

    for period in [10, 20, 50].iter() {
        group.bench_with_input(BenchmarkId::new("sma", period), period, |b, &period| {
            b.iter(|| Sma::new(period).calculate(black_box(&prices)))
        });
        group.bench_with_input(BenchmarkId::new("ema", period), period, |b, &period| {
            b.iter(|| Ema::new(period).calculate(black_box(&prices)))
        });
    }

    group.bench_function("rsi_14", |b| {
        b.iter(|| Rsi::new(14).calculate(black_box(&prices)))
    });

    group.finish();
}

fn bench_strategies(c: &mut Criterion) {
    let basket = generate_basket(5, 1000);

    let mut group = c.benchmark_group("strategies");

    group.bench_function("momentum_5x1000", |b| {
        let strategy = MomentumCrossover::default_params();
        b.iter(|| run_strategy(black_box(&basket), &strategy))
    });

    group.bench_function("mean_reversion_5x1000", |b| {
        let strategy = MeanReversion::default_params();
        b.iter(|| run_strategy(black_box(&basket), &strategy))
    });

    group.finish();
}

fn bench_optimizer(c: &mut Criterion) {
    let basket = generate_basket(5, 252);

    let mut group = c.benchmark_group("optimizer");
    group.sample_size(20);

    for trials in [10, 100].iter() {
        group.bench_with_input(
            BenchmarkId::new("monte_carlo", trials),
            trials,
            |b, &trials| {
                let config = OptimizerConfig::default().with_seed(42).with_trials(trials);
                b.iter(|| optimize(black_box(&basket), &config))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_indicators, bench_strategies, bench_optimizer);
criterion_main!(benches);
