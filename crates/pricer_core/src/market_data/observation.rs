//! Market observation snapshot.

use crate::types::PricingError;

/// Immutable market snapshot supplied once per valuation.
///
/// Holds the spot price S₀, annualised volatility σ, continuous dividend or
/// carry yield q and the risk-free rate r. Pricers read it and never mutate
/// it; a different volatility is expressed by building a new snapshot with
/// [`MarketObservation::with_volatility`].
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketObservation;
///
/// let market = MarketObservation::new(100.0, 0.2, 0.0, 0.05).unwrap();
/// assert_eq!(market.spot(), 100.0);
///
/// assert!(MarketObservation::new(-1.0, 0.2, 0.0, 0.05).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketObservation {
    spot: f64,
    volatility: f64,
    dividend_yield: f64,
    rate: f64,
}

impl MarketObservation {
    /// Create a validated observation.
    ///
    /// # Arguments
    ///
    /// * `spot` - Spot price S₀ (> 0)
    /// * `volatility` - Annualised volatility σ (> 0)
    /// * `dividend_yield` - Continuous carry yield q
    /// * `rate` - Continuously compounded risk-free rate r
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidInput` for a non-positive spot or volatility, or
    /// any non-finite field.
    pub fn new(
        spot: f64,
        volatility: f64,
        dividend_yield: f64,
        rate: f64,
    ) -> Result<Self, PricingError> {
        let observation = Self {
            spot,
            volatility,
            dividend_yield,
            rate,
        };
        observation.validate()?;
        Ok(observation)
    }

    /// Check the invariants of a snapshot, e.g. one deserialised from config.
    pub fn validate(&self) -> Result<(), PricingError> {
        let fields = [
            ("spot", self.spot),
            ("volatility", self.volatility),
            ("dividend_yield", self.dividend_yield),
            ("rate", self.rate),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }
        if self.spot <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "spot must be positive, got {}",
                self.spot
            )));
        }
        if self.volatility <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "volatility must be positive, got {}",
                self.volatility
            )));
        }
        Ok(())
    }

    /// Same snapshot with a different volatility.
    pub fn with_volatility(&self, volatility: f64) -> Result<Self, PricingError> {
        Self::new(self.spot, volatility, self.dividend_yield, self.rate)
    }

    /// Spot price S₀.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Annualised volatility σ.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Continuous dividend / carry yield q.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Risk-free rate r.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let m = MarketObservation::new(50.0, 0.3, 0.01, 0.04).unwrap();
        assert_eq!(m.spot(), 50.0);
        assert_eq!(m.volatility(), 0.3);
        assert_eq!(m.dividend_yield(), 0.01);
        assert_eq!(m.rate(), 0.04);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(MarketObservation::new(0.0, 0.2, 0.0, 0.05).is_err());
        assert!(MarketObservation::new(100.0, 0.0, 0.0, 0.05).is_err());
        assert!(MarketObservation::new(100.0, 0.2, f64::NAN, 0.05).is_err());
        assert!(MarketObservation::new(100.0, 0.2, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_negative_rate_allowed() {
        assert!(MarketObservation::new(100.0, 0.2, 0.0, -0.005).is_ok());
    }

    #[test]
    fn test_with_volatility_keeps_other_fields() {
        let m = MarketObservation::new(100.0, 0.2, 0.02, 0.05).unwrap();
        let bumped = m.with_volatility(0.25).unwrap();
        assert_eq!(bumped.volatility(), 0.25);
        assert_eq!(bumped.spot(), m.spot());
        assert_eq!(bumped.dividend_yield(), m.dividend_yield());
        assert!(m.with_volatility(-0.1).is_err());
    }
}
