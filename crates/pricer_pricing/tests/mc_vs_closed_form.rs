//! Monte Carlo convergence to the closed-form references.

use pricer_core::market_data::MarketObservation;
use pricer_models::analytical::{bs_price, norm_cdf, BlackScholes};
use pricer_models::engine::{PricingEngine, Valuation};
use pricer_models::instruments::{ContractSpec, OptionType, PayoffKind};
use pricer_pricing::mc::{MonteCarloConfig, MonteCarloEngine};

fn standard_market() -> MarketObservation {
    MarketObservation::new(100.0, 0.2, 0.0, 0.05).unwrap()
}

fn run(
    contract: &ContractSpec,
    market: &MarketObservation,
    sims: usize,
    steps: usize,
    seed: u64,
) -> Valuation {
    let config = MonteCarloConfig::builder()
        .simulations(sims)
        .steps(steps)
        .seed(seed)
        .build()
        .unwrap();
    MonteCarloEngine::new(config)
        .unwrap()
        .price(contract, market)
        .unwrap()
}

/// Discretely monitored geometric Asian call on n + 1 fixings (t = 0, dt, ..., T).
fn geometric_asian_call(market: &MarketObservation, strike: f64, expiry: f64, steps: usize) -> f64 {
    let n = steps as f64;
    let dt = expiry / n;
    let sigma = market.volatility();
    let mean = market.spot().ln()
        + (market.rate() - market.dividend_yield() - 0.5 * sigma * sigma) * expiry / 2.0;
    let variance = sigma * sigma * dt * n * (2.0 * n + 1.0) / (6.0 * (n + 1.0));
    let sd = variance.sqrt();
    let d2 = (mean - strike.ln()) / sd;
    let d1 = d2 + sd;
    (-market.rate() * expiry).exp()
        * ((mean + 0.5 * variance).exp() * norm_cdf(d1) - strike * norm_cdf(d2))
}

#[test]
fn test_european_call_within_one_percent() {
    let call = ContractSpec::new(PayoffKind::Call, 100.0, 1.0).unwrap();
    let reference = bs_price(100.0, 100.0, 1.0, 0.05, 0.2, 0.0, OptionType::Call).unwrap();
    let mc = run(&call, &standard_market(), 100_000, 1, 42);
    let relative = (mc.price - reference).abs() / reference;
    assert!(
        relative < 0.01,
        "mc = {:.5} ± {:.5}, closed form = {:.5}",
        mc.price,
        mc.std_error.unwrap(),
        reference
    );
}

#[test]
fn test_error_shrinks_with_simulations() {
    let put = ContractSpec::new(PayoffKind::Put, 100.0, 0.5).unwrap();
    let market = MarketObservation::new(100.0, 0.3, 0.02, 0.04).unwrap();
    let reference = bs_price(100.0, 100.0, 0.5, 0.04, 0.3, 0.02, OptionType::Put).unwrap();

    let rms_error = |sims: usize| {
        let squared: f64 = (0..16)
            .map(|seed| (run(&put, &market, sims, 1, seed).price - reference).powi(2))
            .sum();
        (squared / 16.0).sqrt()
    };
    let coarse = rms_error(1_000);
    let fine = rms_error(64_000);
    assert!(fine < coarse / 2.0, "coarse = {:.5}, fine = {:.5}", coarse, fine);
}

#[test]
fn test_standard_error_scales_with_root_n() {
    let call = ContractSpec::new(PayoffKind::Call, 95.0, 1.0).unwrap();
    let small = run(&call, &standard_market(), 10_000, 1, 1).std_error.unwrap();
    let large = run(&call, &standard_market(), 160_000, 1, 2).std_error.unwrap();
    let ratio = small / large;
    assert!((ratio - 4.0).abs() < 0.4, "ratio = {}", ratio);
}

#[test]
fn test_digital_call_matches_closed_form() {
    let market = MarketObservation::new(100.0, 0.25, 0.01, 0.03).unwrap();
    let digital = ContractSpec::new(PayoffKind::DigitalCall, 105.0, 1.0)
        .unwrap()
        .with_amount(10.0)
        .unwrap();
    let reference = BlackScholes::from_market(&market)
        .unwrap()
        .digital_call(105.0, 1.0, 10.0);
    let mc = run(&digital, &market, 200_000, 1, 7);
    let se = mc.std_error.unwrap();
    assert!((mc.price - reference).abs() < 4.0 * se, "mc = {}, ref = {}", mc.price, reference);
}

#[test]
fn test_range_accrual_matches_static_replication() {
    let range = ContractSpec::range_accrual(90.0, 110.0, 0.5, 5.0).unwrap();
    let model = BlackScholes::from_market(&standard_market()).unwrap();
    let reference = model.range_accrual(90.0, 110.0, 0.5, 5.0);
    let mc = run(&range, &standard_market(), 200_000, 4, 11);
    let se = mc.std_error.unwrap();
    assert!((mc.price - reference).abs() < 4.0 * se, "mc = {}, ref = {}", mc.price, reference);
}

#[test]
fn test_asian_call_between_geometric_and_european() {
    let steps = 12;
    let asian = ContractSpec::new(PayoffKind::AsianCall, 100.0, 1.0).unwrap();
    let mc = run(&asian, &standard_market(), 100_000, steps, 3);
    let se = mc.std_error.unwrap();

    let geometric = geometric_asian_call(&standard_market(), 100.0, 1.0, steps);
    let european = bs_price(100.0, 100.0, 1.0, 0.05, 0.2, 0.0, OptionType::Call).unwrap();
    assert!(mc.price > geometric - 3.0 * se, "asian = {}, geometric = {}", mc.price, geometric);
    assert!(mc.price < european, "asian = {}, european = {}", mc.price, european);
}

#[test]
fn test_fixed_seed_is_reproducible() {
    let put = ContractSpec::new(PayoffKind::AsianPut, 100.0, 1.0).unwrap();
    let a = run(&put, &standard_market(), 5_000, 24, 99);
    let b = run(&put, &standard_market(), 5_000, 24, 99);
    let c = run(&put, &standard_market(), 5_000, 24, 100);
    assert_eq!(a, b);
    assert_ne!(a.price, c.price);
}
