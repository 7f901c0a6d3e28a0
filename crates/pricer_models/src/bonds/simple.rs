//! Whole-year bond formulas at a flat annual rate.

/// Zero-coupon bond: `face / (1 + r)^T`.
///
/// ```
/// use pricer_models::bonds::zero_coupon_price;
///
/// assert!((zero_coupon_price(100.0, 0.05, 2.0) - 100.0 / 1.1025).abs() < 1e-12);
/// ```
#[inline]
pub fn zero_coupon_price(face_value: f64, rate: f64, years: f64) -> f64 {
    face_value / (1.0 + rate).powf(years)
}

/// Annual-pay coupon bond maturing in `years` whole years.
pub fn annual_coupon_bond_price(face_value: f64, rate: f64, years: u32, coupon_rate: f64) -> f64 {
    let coupons: f64 = (1..=years)
        .map(|i| coupon_rate * face_value / (1.0 + rate).powi(i as i32))
        .sum();
    coupons + zero_coupon_price(face_value, rate, years as f64)
}
