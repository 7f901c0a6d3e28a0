//! Coupon bond analytics at a flat yield.
//!
//! - [`CouponBond`]: Price, cash flows and yield to maturity
//! - [`accrued_interest`] / [`dirty_price`]: Settlement between coupons
//! - [`zero_coupon_price`] / [`annual_coupon_bond_price`]: Whole-year formulas

mod accrued;
mod coupon;
mod simple;

pub use accrued::{accrued_interest, dirty_price};
pub use coupon::{CouponBond, CouponFrequency};
pub use simple::{annual_coupon_bond_price, zero_coupon_price};
