//! Black-Scholes-Merton closed form with a continuous carry yield.
//!
//! ## Formulas
//!
//! **Call**: C = S·e^(-qT)·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put**: P = K·e^(-rT)·N(-d₂) - S·e^(-qT)·N(-d₁)
//! **Digital call**: e^(-rT)·N(d₂)·amount
//! **Digital put**: e^(-rT)·N(-d₂)·amount
//!
//! Where:
//! - d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! A single-period range accrual is the difference of two digital calls
//! scaled by the coupon.

use num_traits::Float;
use pricer_core::market_data::MarketObservation;
use pricer_core::types::PricingError;

use super::distributions::{norm_cdf, norm_pdf};
use super::greeks::Greeks;
use crate::instruments::OptionType;

#[inline]
fn constant<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

fn to_f64<T: Float>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Black-Scholes-Merton model for European payoffs.
///
/// Expiry and strike are arguments of each pricing call so one model value
/// prices a whole strip.
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0_f64, 0.05, 0.2, 0.0).unwrap();
/// let call = bs.price_call(100.0, 1.0);
/// let put = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call - put - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BlackScholes<T: Float> {
    spot: T,
    rate: T,
    volatility: T,
    dividend_yield: T,
}

impl<T: Float> BlackScholes<T> {
    /// Creates a new model.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` if spot or volatility is not positive,
    /// or any input is non-finite.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// assert!(BlackScholes::new(-100.0_f64, 0.05, 0.2, 0.0).is_err());
    /// assert!(BlackScholes::new(100.0_f64, 0.05, 0.0, 0.0).is_err());
    /// ```
    pub fn new(spot: T, rate: T, volatility: T, dividend_yield: T) -> Result<Self, PricingError> {
        if !(spot > T::zero() && spot.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "spot must be positive, got {}",
                to_f64(spot)
            )));
        }
        if !(volatility > T::zero() && volatility.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "volatility must be positive, got {}",
                to_f64(volatility)
            )));
        }
        if !rate.is_finite() || !dividend_yield.is_finite() {
            return Err(PricingError::InvalidInput(
                "rate and dividend yield must be finite".to_string(),
            ));
        }
        Ok(Self {
            spot,
            rate,
            volatility,
            dividend_yield,
        })
    }

    /// Spot price S.
    #[inline]
    pub fn spot(&self) -> T {
        self.spot
    }

    /// Risk-free rate r.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Volatility σ.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }

    /// Continuous carry yield q.
    #[inline]
    pub fn dividend_yield(&self) -> T {
        self.dividend_yield
    }

    /// d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
    #[inline]
    pub fn d1(&self, strike: T, expiry: T) -> T {
        let half = constant::<T>(0.5);
        let drift =
            (self.rate - self.dividend_yield + half * self.volatility * self.volatility) * expiry;
        ((self.spot / strike).ln() + drift) / (self.volatility * expiry.sqrt())
    }

    /// d₂ = d₁ - σ√T
    #[inline]
    pub fn d2(&self, strike: T, expiry: T) -> T {
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    #[inline]
    fn discount(&self, expiry: T) -> T {
        (-self.rate * expiry).exp()
    }

    #[inline]
    fn carry_discount(&self, expiry: T) -> T {
        (-self.dividend_yield * expiry).exp()
    }

    /// European call price.
    #[inline]
    pub fn price_call(&self, strike: T, expiry: T) -> T {
        let d1 = self.d1(strike, expiry);
        let d2 = d1 - self.volatility * expiry.sqrt();
        self.spot * self.carry_discount(expiry) * norm_cdf(d1)
            - strike * self.discount(expiry) * norm_cdf(d2)
    }

    /// European put price.
    #[inline]
    pub fn price_put(&self, strike: T, expiry: T) -> T {
        let d1 = self.d1(strike, expiry);
        let d2 = d1 - self.volatility * expiry.sqrt();
        strike * self.discount(expiry) * norm_cdf(-d2)
            - self.spot * self.carry_discount(expiry) * norm_cdf(-d1)
    }

    /// Vanilla price for the given option type.
    #[inline]
    pub fn price(&self, strike: T, expiry: T, option_type: OptionType) -> T {
        match option_type {
            OptionType::Call => self.price_call(strike, expiry),
            OptionType::Put => self.price_put(strike, expiry),
        }
    }

    /// Cash-or-nothing call paying `amount` if S_T > K.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// let bs = BlackScholes::new(100.0_f64, 0.05, 0.2, 0.0).unwrap();
    /// let call = bs.digital_call(100.0, 1.0, 1.0);
    /// let put = bs.digital_put(100.0, 1.0, 1.0);
    ///
    /// // The pair pays one unit for sure
    /// assert!((call + put - (-0.05_f64).exp()).abs() < 1e-12);
    /// ```
    #[inline]
    pub fn digital_call(&self, strike: T, expiry: T, amount: T) -> T {
        self.discount(expiry) * norm_cdf(self.d2(strike, expiry)) * amount
    }

    /// Cash-or-nothing put paying `amount` if S_T < K.
    #[inline]
    pub fn digital_put(&self, strike: T, expiry: T, amount: T) -> T {
        self.discount(expiry) * norm_cdf(-self.d2(strike, expiry)) * amount
    }

    /// Single-period range accrual paying `coupon` if `lower < S_T < upper`.
    ///
    /// Replicated statically as `coupon·(DC(lower) - DC(upper))` with unit
    /// digital calls.
    #[inline]
    pub fn range_accrual(&self, lower: T, upper: T, expiry: T, coupon: T) -> T {
        let above_lower = self.digital_call(lower, expiry, T::one());
        let above_upper = self.digital_call(upper, expiry, T::one());
        coupon * (above_lower - above_upper)
    }

    /// Analytic Greeks for a long vanilla position.
    ///
    /// Theta is per calendar day, vega per 1% of volatility and rho per 1%
    /// of rate.
    pub fn greeks(&self, strike: T, expiry: T, option_type: OptionType) -> Greeks<T> {
        let sqrt_t = expiry.sqrt();
        let d1 = self.d1(strike, expiry);
        let d2 = d1 - self.volatility * sqrt_t;
        let pdf = norm_pdf(d1);
        let carry = self.carry_discount(expiry);
        let discount = self.discount(expiry);
        let hundred = constant::<T>(100.0);
        let days = constant::<T>(365.0);
        let two = constant::<T>(2.0);

        let gamma = carry * pdf / (self.spot * self.volatility * sqrt_t);
        let vega = self.spot * carry * pdf * sqrt_t / hundred;
        let decay = -(self.spot * carry * pdf * self.volatility) / (two * sqrt_t);

        let (delta, theta, rho) = match option_type {
            OptionType::Call => (
                carry * norm_cdf(d1),
                decay - self.rate * strike * discount * norm_cdf(d2)
                    + self.dividend_yield * self.spot * carry * norm_cdf(d1),
                strike * expiry * discount * norm_cdf(d2),
            ),
            OptionType::Put => (
                -carry * norm_cdf(-d1),
                decay + self.rate * strike * discount * norm_cdf(-d2)
                    - self.dividend_yield * self.spot * carry * norm_cdf(-d1),
                -strike * expiry * discount * norm_cdf(-d2),
            ),
        };

        Greeks {
            delta,
            gamma,
            theta: theta / days,
            vega,
            rho: rho / hundred,
        }
    }
}

impl BlackScholes<f64> {
    /// Model parameters taken from a market snapshot.
    pub fn from_market(market: &MarketObservation) -> Result<Self, PricingError> {
        Self::new(
            market.spot(),
            market.rate(),
            market.volatility(),
            market.dividend_yield(),
        )
    }
}

/// Closed-form vanilla price.
///
/// Validates σ > 0 and T > 0 at the boundary instead of returning NaN.
///
/// # Examples
/// ```
/// use pricer_models::analytical::bs_price;
/// use pricer_models::instruments::OptionType;
///
/// let call = bs_price(100.0, 100.0, 1.0, 0.05, 0.2, 0.0, OptionType::Call).unwrap();
/// assert!((call - 10.450_583_572_185_565).abs() < 1e-9);
///
/// assert!(bs_price(100.0, 100.0, 0.0, 0.05, 0.2, 0.0, OptionType::Call).is_err());
/// ```
pub fn bs_price(
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    volatility: f64,
    dividend_yield: f64,
    option_type: OptionType,
) -> Result<f64, PricingError> {
    validate_strike_expiry(strike, expiry)?;
    let model = BlackScholes::new(spot, rate, volatility, dividend_yield)?;
    Ok(model.price(strike, expiry, option_type))
}

pub(crate) fn validate_strike_expiry(strike: f64, expiry: f64) -> Result<(), PricingError> {
    if !(strike > 0.0 && strike.is_finite()) {
        return Err(PricingError::InvalidInput(format!(
            "strike must be positive, got {}",
            strike
        )));
    }
    if !(expiry > 0.0 && expiry.is_finite()) {
        return Err(PricingError::InvalidInput(format!(
            "expiry must be positive, got {}",
            expiry
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> BlackScholes<f64> {
        BlackScholes::new(100.0, 0.05, 0.2, 0.0).unwrap()
    }

    // ==========================================================
    // Construction
    // ==========================================================

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(BlackScholes::new(0.0_f64, 0.05, 0.2, 0.0).is_err());
        assert!(BlackScholes::new(100.0_f64, 0.05, -0.2, 0.0).is_err());
        assert!(BlackScholes::new(100.0_f64, f64::NAN, 0.2, 0.0).is_err());
        let err = BlackScholes::new(100.0_f64, 0.05, 0.0, 0.0).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_from_market() {
        let market = MarketObservation::new(100.0, 0.2, 0.01, 0.05).unwrap();
        let bs = BlackScholes::from_market(&market).unwrap();
        assert_eq!(bs.dividend_yield(), 0.01);
        assert_eq!(bs.rate(), 0.05);
    }

    // ==========================================================
    // Vanilla prices
    // ==========================================================

    #[test]
    fn test_reference_prices() {
        let bs = model();
        assert_relative_eq!(
            bs.price_call(100.0, 1.0),
            10.450_583_572_185_565,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            bs.price_put(100.0, 1.0),
            5.573_526_022_256_971,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_put_call_parity_with_carry() {
        let bs = BlackScholes::new(100.0, 0.03, 0.25, 0.02).unwrap();
        for strike in [80.0, 100.0, 125.0] {
            let lhs = bs.price_call(strike, 2.0) - bs.price_put(strike, 2.0);
            let rhs = 100.0 * (-0.04_f64).exp() - strike * (-0.06_f64).exp();
            assert_relative_eq!(lhs, rhs, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_bs_price_validates_boundary() {
        assert!(bs_price(100.0, 100.0, -1.0, 0.05, 0.2, 0.0, OptionType::Put)
            .unwrap_err()
            .is_invalid_input());
        assert!(bs_price(100.0, 0.0, 1.0, 0.05, 0.2, 0.0, OptionType::Put).is_err());
        assert!(bs_price(100.0, 100.0, 1.0, 0.05, 0.0, 0.0, OptionType::Put).is_err());
    }

    // ==========================================================
    // Digitals and range accrual
    // ==========================================================

    #[test]
    fn test_digital_call_reference() {
        // e^{-rT} N(d2) for ATM, T = 1: d2 = (r - σ²/2) / σ = 0.15
        let expected = (-0.05_f64).exp() * norm_cdf(0.15);
        assert_relative_eq!(
            model().digital_call(100.0, 1.0, 1.0),
            expected,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_digital_scales_with_amount() {
        let bs = model();
        assert_relative_eq!(
            bs.digital_put(95.0, 0.5, 10.0),
            10.0 * bs.digital_put(95.0, 0.5, 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_range_accrual_is_digital_spread() {
        let bs = BlackScholes::new(100.0, 0.05, 0.2, 0.01).unwrap();
        let expected = 5.0 * (bs.digital_call(90.0, 1.0, 1.0) - bs.digital_call(110.0, 1.0, 1.0));
        assert_eq!(bs.range_accrual(90.0, 110.0, 1.0, 5.0), expected);
    }

    // ==========================================================
    // Greeks
    // ==========================================================

    #[test]
    fn test_greeks_match_finite_differences() {
        let bs = BlackScholes::new(100.0, 0.05, 0.2, 0.02).unwrap();
        let (strike, expiry) = (105.0, 0.75);
        for option_type in [OptionType::Call, OptionType::Put] {
            let g = bs.greeks(strike, expiry, option_type);
            let price = |s: f64, r: f64, v: f64, t: f64| {
                BlackScholes::new(s, r, v, 0.02)
                    .unwrap()
                    .price(strike, t, option_type)
            };
            let h = 1e-3;
            let delta = (price(100.0 + h, 0.05, 0.2, expiry) - price(100.0 - h, 0.05, 0.2, expiry))
                / (2.0 * h);
            let gamma = (price(100.0 + h, 0.05, 0.2, expiry) - 2.0 * price(100.0, 0.05, 0.2, expiry)
                + price(100.0 - h, 0.05, 0.2, expiry))
                / (h * h);
            let vega = (price(100.0, 0.05, 0.2 + h, expiry) - price(100.0, 0.05, 0.2 - h, expiry))
                / (2.0 * h)
                / 100.0;
            let rho = (price(100.0, 0.05 + h, 0.2, expiry) - price(100.0, 0.05 - h, 0.2, expiry))
                / (2.0 * h)
                / 100.0;
            // Theta is minus the derivative in time to expiry
            let theta = -(price(100.0, 0.05, 0.2, expiry + h) - price(100.0, 0.05, 0.2, expiry - h))
                / (2.0 * h)
                / 365.0;

            assert_relative_eq!(g.delta, delta, epsilon = 1e-6);
            assert_relative_eq!(g.gamma, gamma, epsilon = 1e-5);
            assert_relative_eq!(g.vega, vega, epsilon = 1e-6);
            assert_relative_eq!(g.rho, rho, epsilon = 1e-6);
            assert_relative_eq!(g.theta, theta, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_delta_bounds() {
        let bs = model();
        let call = bs.greeks(100.0, 1.0, OptionType::Call);
        let put = bs.greeks(100.0, 1.0, OptionType::Put);
        assert!(call.delta > 0.0 && call.delta < 1.0);
        assert!(put.delta < 0.0 && put.delta > -1.0);
        assert_relative_eq!(call.delta - put.delta, 1.0, epsilon = 1e-12);
        assert_relative_eq!(call.gamma, put.gamma, epsilon = 1e-15);
    }
}
