//! Parametric smile calibration.
//!
//! - [`SviParams`] / [`SviCalibrator`]: Raw SVI in log-moneyness
//! - [`SabrParams`] / [`SabrCalibrator`]: Leading-order SABR in strike
//!
//! Both calibrators implement [`pricer_core::traits::calibration::Calibrator`]:
//! the residual function is pure and the fitted parameters come back as a
//! new value only when the fit converges inside its bounds.

mod sabr;
mod svi;

pub use sabr::{fit_sabr, SabrCalibrator, SabrParams, ATM_LOG_MONEYNESS};
pub use svi::{fit_svi, SviCalibrator, SviParams};
