//! Core error and time types.
//!
//! This module provides:
//! - `error`: The pricing error taxonomy plus solver and date errors
//! - `time`: `Date` and `DayCountConvention` for coupon accrual
//!
//! # Re-exports
//!
//! - [`PricingError`], [`SolverError`], [`DateError`] from `error`
//! - [`Date`], [`DayCountConvention`] from `time`

pub mod error;
pub mod time;

pub use error::{DateError, PricingError, SolverError};
pub use time::{Date, DayCountConvention};
