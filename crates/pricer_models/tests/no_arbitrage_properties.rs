//! Property tests for the no-arbitrage relations between the pricers.
//!
//! 1. **Early exercise**: American >= European >= 0 on the same lattice
//! 2. **Put-call parity**: closed form, with carry
//! 3. **Range accrual**: equals the coupon-scaled digital call spread

use pricer_core::market_data::MarketObservation;
use pricer_models::analytical::BlackScholes;
use pricer_models::instruments::{ContractSpec, ExerciseStyle, PayoffKind};
use pricer_models::lattice::binomial_price;
use proptest::prelude::*;

fn market_strategy() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (50.0..150.0f64, 0.05..0.6f64, 0.0..0.05f64, 0.0..0.08f64)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn american_dominates_european(
        (spot, vol, q, r) in market_strategy(),
        strike in 60.0..140.0f64,
        expiry in 0.1..2.0f64,
        is_call in any::<bool>(),
    ) {
        let market = MarketObservation::new(spot, vol, q, r).unwrap();
        let kind = if is_call { PayoffKind::Call } else { PayoffKind::Put };
        let european = ContractSpec::new(kind, strike, expiry).unwrap();
        let american = european.with_exercise(ExerciseStyle::American);

        let e = binomial_price(&european, &market, 60).unwrap();
        let a = binomial_price(&american, &market, 60).unwrap();
        prop_assert!(e >= 0.0);
        prop_assert!(a >= e - 1e-12, "american {} < european {}", a, e);
        prop_assert!(a >= european.payoff_at(spot) - 1e-12);
    }

    #[test]
    fn put_call_parity(
        (spot, vol, q, r) in market_strategy(),
        strike in 60.0..140.0f64,
        expiry in 0.05..3.0f64,
    ) {
        let bs = BlackScholes::new(spot, r, vol, q).unwrap();
        let lhs = bs.price_call(strike, expiry) - bs.price_put(strike, expiry);
        let rhs = spot * (-q * expiry).exp() - strike * (-r * expiry).exp();
        prop_assert!((lhs - rhs).abs() < 1e-9 * spot.max(strike));
    }

    #[test]
    fn range_accrual_is_digital_spread(
        (spot, vol, q, r) in market_strategy(),
        lower in 60.0..100.0f64,
        width in 1.0..60.0f64,
        coupon in 0.0..20.0f64,
        expiry in 0.05..3.0f64,
    ) {
        let upper = lower + width;
        let bs = BlackScholes::new(spot, r, vol, q).unwrap();
        let spread = bs.digital_call(lower, expiry, 1.0) - bs.digital_call(upper, expiry, 1.0);
        prop_assert_eq!(bs.range_accrual(lower, upper, expiry, coupon), coupon * spread);
    }

    #[test]
    fn digital_pair_pays_discounted_amount(
        (spot, vol, q, r) in market_strategy(),
        strike in 60.0..140.0f64,
        amount in 0.1..100.0f64,
        expiry in 0.05..3.0f64,
    ) {
        let bs = BlackScholes::new(spot, r, vol, q).unwrap();
        let total =
            bs.digital_call(strike, expiry, amount) + bs.digital_put(strike, expiry, amount);
        prop_assert!((total - amount * (-r * expiry).exp()).abs() < 1e-10 * amount);
    }
}
