//! Implied volatility by bracketed root finding.

use pricer_core::math::solvers::{BrentSolver, SolverConfig};
use pricer_core::types::PricingError;
use tracing::debug;

use super::black_scholes::{validate_strike_expiry, BlackScholes};
use crate::instruments::OptionType;

/// Lower end of the volatility search interval.
pub const MIN_IMPLIED_VOL: f64 = 1e-10;
/// Upper end of the volatility search interval.
pub const MAX_IMPLIED_VOL: f64 = 5.0;

/// No-arbitrage price band `[lower, upper]` for a European option.
///
/// Call: `[max(S·e^(-qT) - K·e^(-rT), 0), S·e^(-qT)]`
/// Put: `[max(K·e^(-rT) - S·e^(-qT), 0), K·e^(-rT)]`
pub fn price_bounds(
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    dividend_yield: f64,
    option_type: OptionType,
) -> (f64, f64) {
    let forward_spot = spot * (-dividend_yield * expiry).exp();
    let discounted_strike = strike * (-rate * expiry).exp();
    match option_type {
        OptionType::Call => ((forward_spot - discounted_strike).max(0.0), forward_spot),
        OptionType::Put => (
            (discounted_strike - forward_spot).max(0.0),
            discounted_strike,
        ),
    }
}

/// Volatility that reproduces `market_price` under Black-Scholes-Merton.
///
/// The search runs Brent's method over `(1e-10, 5)`.
///
/// # Errors
/// - `PricingError::InvalidInput` for non-positive spot, strike or expiry
/// - `PricingError::NumericalDegeneracy` when the price lies outside the
///   no-arbitrage band or no volatility in the interval reproduces it
///
/// # Examples
/// ```
/// use pricer_models::analytical::{bs_price, implied_volatility};
/// use pricer_models::instruments::OptionType;
///
/// let price = bs_price(100.0, 110.0, 0.5, 0.03, 0.27, 0.01, OptionType::Call).unwrap();
/// let vol = implied_volatility(price, 100.0, 110.0, 0.5, 0.03, 0.01, OptionType::Call).unwrap();
/// assert!((vol - 0.27).abs() < 1e-8);
///
/// // Above the spot: no volatility can explain it
/// assert!(implied_volatility(150.0, 100.0, 110.0, 0.5, 0.03, 0.0, OptionType::Call)
///     .unwrap_err()
///     .is_numerical_degeneracy());
/// ```
pub fn implied_volatility(
    market_price: f64,
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    dividend_yield: f64,
    option_type: OptionType,
) -> Result<f64, PricingError> {
    validate_strike_expiry(strike, expiry)?;
    if !(spot > 0.0 && spot.is_finite()) {
        return Err(PricingError::InvalidInput(format!(
            "spot must be positive, got {}",
            spot
        )));
    }
    if !market_price.is_finite() {
        return Err(PricingError::InvalidInput(
            "market price must be finite".to_string(),
        ));
    }

    let (lower, upper) = price_bounds(spot, strike, expiry, rate, dividend_yield, option_type);
    if market_price < lower || market_price > upper {
        debug!(
            market_price,
            lower,
            upper,
            "price outside no-arbitrage band"
        );
        return Err(PricingError::NumericalDegeneracy(format!(
            "price {} outside no-arbitrage bounds [{:.6}, {:.6}]",
            market_price, lower, upper
        )));
    }

    let objective = |sigma: f64| match BlackScholes::new(spot, rate, sigma, dividend_yield) {
        Ok(model) => model.price(strike, expiry, option_type) - market_price,
        Err(_) => f64::NAN,
    };

    let solver = BrentSolver::new(SolverConfig::new(1e-12, 200));
    let sigma = solver
        .find_root(objective, MIN_IMPLIED_VOL, MAX_IMPLIED_VOL)
        .map_err(|err| {
            PricingError::NumericalDegeneracy(format!("implied volatility not found: {}", err))
        })?;
    Ok(sigma)
}
