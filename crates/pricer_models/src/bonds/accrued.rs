//! Accrued interest and dirty price.

use pricer_core::types::{Date, DayCountConvention, PricingError};

/// Interest accrued since the last coupon date.
///
/// `face · coupon_rate · yf(last_coupon, settlement)` where `yf` is the
/// year fraction under `day_count`.
///
/// # Errors
/// `PricingError::InvalidInput` when settlement precedes the last coupon.
///
/// # Examples
/// ```
/// use pricer_core::types::{Date, DayCountConvention};
/// use pricer_models::bonds::accrued_interest;
///
/// let last = Date::from_ymd(2024, 1, 15).unwrap();
/// let settle = Date::from_ymd(2024, 4, 15).unwrap();
/// let accrued =
///     accrued_interest(1000.0, 0.06, last, settle, DayCountConvention::Thirty360).unwrap();
/// assert!((accrued - 15.0).abs() < 1e-12);
/// ```
pub fn accrued_interest(
    face_value: f64,
    coupon_rate: f64,
    last_coupon: Date,
    settlement: Date,
    day_count: DayCountConvention,
) -> Result<f64, PricingError> {
    if settlement < last_coupon {
        return Err(PricingError::InvalidInput(format!(
            "settlement {} precedes last coupon {}",
            settlement, last_coupon
        )));
    }
    Ok(face_value * coupon_rate * day_count.year_fraction(last_coupon, settlement))
}

/// Clean price plus accrued interest.
#[inline]
pub fn dirty_price(clean_price: f64, accrued: f64) -> f64 {
    clean_price + accrued
}
