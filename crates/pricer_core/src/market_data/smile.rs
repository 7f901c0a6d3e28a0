//! Implied volatility quotes for a single expiry.

use crate::types::PricingError;

/// A single (strike, implied volatility) market quote.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolQuote {
    /// Strike price.
    pub strike: f64,
    /// Market implied volatility (annualised, decimal).
    pub implied_vol: f64,
}

impl VolQuote {
    /// Create a quote.
    pub fn new(strike: f64, implied_vol: f64) -> Self {
        Self {
            strike,
            implied_vol,
        }
    }
}

/// Ordered set of quotes for one expiry; the input to smile calibration.
///
/// Quotes are sorted by strike on construction and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::{VolQuote, VolSmile};
///
/// let smile = VolSmile::new(0.5, vec![
///     VolQuote::new(110.0, 0.21),
///     VolQuote::new(90.0, 0.25),
///     VolQuote::new(100.0, 0.22),
/// ]).unwrap();
///
/// assert_eq!(smile.strikes(), vec![90.0, 100.0, 110.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolSmile {
    expiry: f64,
    quotes: Vec<VolQuote>,
}

impl VolSmile {
    /// Build a smile from unordered quotes.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidInput` for an empty set, a non-positive expiry,
    /// or any non-positive / non-finite strike or volatility.
    pub fn new(expiry: f64, mut quotes: Vec<VolQuote>) -> Result<Self, PricingError> {
        if !(expiry > 0.0) || !expiry.is_finite() {
            return Err(PricingError::InvalidInput(format!(
                "smile expiry must be positive, got {}",
                expiry
            )));
        }
        if quotes.is_empty() {
            return Err(PricingError::InvalidInput(
                "smile needs at least one quote".to_string(),
            ));
        }
        for q in &quotes {
            if !(q.strike > 0.0) || !q.strike.is_finite() {
                return Err(PricingError::InvalidInput(format!(
                    "quote strike must be positive, got {}",
                    q.strike
                )));
            }
            if !(q.implied_vol > 0.0) || !q.implied_vol.is_finite() {
                return Err(PricingError::InvalidInput(format!(
                    "quote volatility must be positive, got {} at strike {}",
                    q.implied_vol, q.strike
                )));
            }
        }
        quotes.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        Ok(Self { expiry, quotes })
    }

    /// Expiry in years.
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Quotes ordered by strike.
    pub fn quotes(&self) -> &[VolQuote] {
        &self.quotes
    }

    /// Strikes in ascending order.
    pub fn strikes(&self) -> Vec<f64> {
        self.quotes.iter().map(|q| q.strike).collect()
    }

    /// Implied vols aligned with [`VolSmile::strikes`].
    pub fn vols(&self) -> Vec<f64> {
        self.quotes.iter().map(|q| q.implied_vol).collect()
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Always false for a constructed smile.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_on_construction() {
        let smile = VolSmile::new(
            1.0,
            vec![VolQuote::new(120.0, 0.2), VolQuote::new(80.0, 0.3)],
        )
        .unwrap();
        assert_eq!(smile.strikes(), vec![80.0, 120.0]);
        assert_eq!(smile.vols(), vec![0.3, 0.2]);
        assert_eq!(smile.len(), 2);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(VolSmile::new(1.0, vec![]).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_non_positive_entries_rejected() {
        assert!(VolSmile::new(1.0, vec![VolQuote::new(0.0, 0.2)]).is_err());
        assert!(VolSmile::new(1.0, vec![VolQuote::new(100.0, -0.2)]).is_err());
        assert!(VolSmile::new(0.0, vec![VolQuote::new(100.0, 0.2)]).is_err());
    }
}
