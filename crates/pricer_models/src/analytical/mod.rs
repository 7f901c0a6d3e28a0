//! Closed-form pricing.
//!
//! - [`BlackScholes`]: Vanilla, digital and range accrual prices with a
//!   continuous carry yield
//! - [`Greeks`]: Analytic sensitivities
//! - [`implied_volatility`]: Price to volatility inversion
//! - [`distributions`]: Standard normal CDF and PDF
//!
//! Model types are generic over `T: Float`; the boundary helpers
//! ([`bs_price`], [`implied_volatility`]) work in `f64` and validate inputs.

mod black_scholes;
pub mod distributions;
mod greeks;
mod implied_vol;

pub use black_scholes::{bs_price, BlackScholes};
pub use distributions::{norm_cdf, norm_pdf};
pub use greeks::Greeks;
pub use implied_vol::{implied_volatility, price_bounds, MAX_IMPLIED_VOL, MIN_IMPLIED_VOL};

pub(crate) use black_scholes::validate_strike_expiry;
