//! Sample statistics over price series.

use crate::types::PricingError;

/// Trading days per year used to annualise daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Arithmetic mean. Returns `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with `ddof` degrees of freedom removed.
///
/// `ddof = 0` gives the population estimate, `ddof = 1` the unbiased sample
/// estimate. Returns `None` when fewer than `ddof + 1` values are supplied.
pub fn std_dev(values: &[f64], ddof: usize) -> Option<f64> {
    if values.len() <= ddof {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - ddof) as f64).sqrt())
}

/// Annualised historical volatility from a series of closing prices.
///
/// Takes the population standard deviation of daily log returns
/// `ln(P_t / P_{t-1})` and scales it by `√252`.
///
/// # Errors
///
/// * `PricingError::InvalidInput` - fewer than two closes or a non-positive close
///
/// # Example
///
/// ```
/// use pricer_core::math::statistics::historical_volatility;
///
/// let flat = vec![100.0; 30];
/// assert_eq!(historical_volatility(&flat).unwrap(), 0.0);
/// ```
pub fn historical_volatility(closes: &[f64]) -> Result<f64, PricingError> {
    if closes.len() < 2 {
        return Err(PricingError::InvalidInput(format!(
            "historical volatility needs at least two closes, got {}",
            closes.len()
        )));
    }
    if let Some(bad) = closes.iter().find(|&&c| !(c > 0.0) || !c.is_finite()) {
        return Err(PricingError::InvalidInput(format!(
            "closing prices must be positive and finite, got {}",
            bad
        )));
    }

    let returns: Vec<f64> = closes.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    let daily = std_dev(&returns, 0).unwrap_or(0.0);
    Ok(daily * TRADING_DAYS_PER_YEAR.sqrt())
}
