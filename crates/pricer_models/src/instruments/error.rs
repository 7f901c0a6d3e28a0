//! Instrument error types.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Contract construction errors.
///
/// # Variants
/// - `InvalidStrike`: Strike price is non-positive or non-finite
/// - `InvalidExpiry`: Time to expiry is non-positive or non-finite
/// - `InvalidAmount`: Payoff amount / coupon is negative or non-finite
/// - `InvalidRange`: Range accrual bounds are not `0 < lower < upper`
///
/// # Examples
/// ```
/// use pricer_models::instruments::InstrumentError;
///
/// let err = InstrumentError::InvalidStrike { strike: -100.0 };
/// assert!(format!("{}", err).contains("-100"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Invalid strike price.
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// Invalid expiry time.
    #[error("Invalid expiry: T = {expiry}")]
    InvalidExpiry {
        /// The invalid expiry value
        expiry: f64,
    },

    /// Invalid payoff amount or coupon.
    #[error("Invalid payoff amount: {amount}")]
    InvalidAmount {
        /// The invalid amount
        amount: f64,
    },

    /// Invalid range accrual corridor.
    #[error("Invalid range: [{lower}, {upper}]")]
    InvalidRange {
        /// Lower barrier
        lower: f64,
        /// Upper barrier
        upper: f64,
    },
}

impl From<InstrumentError> for PricingError {
    fn from(err: InstrumentError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}
