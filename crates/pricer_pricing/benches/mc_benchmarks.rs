//! Criterion benchmarks for the Monte Carlo engine.
//!
//! Measures pricing cost against path count for a terminal payoff and
//! against step count for an Asian payoff, plus raw normal generation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pricer_core::market_data::MarketObservation;
use pricer_models::engine::PricingEngine;
use pricer_models::instruments::{ContractSpec, PayoffKind};
use pricer_pricing::mc::{MonteCarloConfig, MonteCarloEngine};
use pricer_pricing::rng::{NormalGenerator, PricerRng};

fn engine(simulations: usize, steps: usize) -> MonteCarloEngine {
    let config = MonteCarloConfig::builder()
        .simulations(simulations)
        .steps(steps)
        .seed(42)
        .build()
        .unwrap();
    MonteCarloEngine::new(config).unwrap()
}

fn bench_european(c: &mut Criterion) {
    let mut group = c.benchmark_group("mc_european");
    let market = MarketObservation::new(100.0, 0.2, 0.0, 0.05).unwrap();
    let call = ContractSpec::new(PayoffKind::Call, 100.0, 1.0).unwrap();

    for sims in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(sims as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sims), &sims, |b, &n| {
            b.iter(|| engine(n, 1).price(black_box(&call), black_box(&market)).unwrap());
        });
    }
    group.finish();
}

fn bench_asian(c: &mut Criterion) {
    let mut group = c.benchmark_group("mc_asian");
    let market = MarketObservation::new(100.0, 0.2, 0.0, 0.05).unwrap();
    let asian = ContractSpec::new(PayoffKind::AsianCall, 100.0, 1.0).unwrap();

    for steps in [12, 52, 252] {
        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, &n| {
            b.iter(|| {
                engine(10_000, n)
                    .price(black_box(&asian), black_box(&market))
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_normals(c: &mut Criterion) {
    let mut rng = PricerRng::from_seed(42);
    let mut buffer = vec![0.0; 65_536];
    c.bench_function("fill_normal_64k", |b| {
        b.iter(|| rng.fill_normal(black_box(&mut buffer)));
    });
}

criterion_group!(benches, bench_european, bench_asian, bench_normals);
criterion_main!(benches);
