//! Core traits shared by the model and engine crates.
//!
//! - [`Float`]: Generic floating-point bound used by the lattice and
//!   closed-form code
//! - [`calibration`]: Least-squares model calibration

/// Generic floating-point trait for numeric computations.
///
/// # Examples
/// ```
/// use pricer_core::traits::Float;
///
/// fn compute_discount<T: Float>(rate: T, time: T) -> T {
///     (-rate * time).exp()
/// }
///
/// let discount_f64: f64 = compute_discount(0.05, 1.0);
/// assert!((discount_f64 - 0.951229).abs() < 1e-5);
/// ```
pub use num_traits::Float;

pub mod calibration;

pub use calibration::{CalibrationConfig, CalibrationResult, Calibrator, ParameterBounds};
