//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: The four recoverable failure classes every pricer and
//!   calibrator reports (invalid input, missing market data, fit divergence,
//!   numerical degeneracy)
//! - `SolverError`: Errors from root-finding and least-squares solvers
//! - `DateError`: Errors from date construction and parsing

use thiserror::Error;

/// Categorised pricing errors.
///
/// Every condition is local and recoverable: a caller valuing many
/// independent contracts skips the failing one (or reports N/A) and carries
/// on with the rest.
///
/// # Variants
/// - `InvalidInput`: Rejected at the pricer boundary (non-positive T or σ,
///   zero lattice steps, unsupported payoff/exercise combination)
/// - `NoMarketData`: A requested quote does not exist; distinct from a zero price
/// - `FitDivergence`: Calibration did not converge or left its bounds
/// - `NumericalDegeneracy`: A formula or root finder has no computable answer
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("expiry must be positive".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: expiry must be positive");
/// assert!(err.is_invalid_input());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PricingError {
    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested market data is unavailable.
    #[error("No market data: {0}")]
    NoMarketData(String),

    /// Calibration failed to produce an admissible fit.
    #[error("{model} fit diverged after {iterations} iterations, rss {residual_ss:.2e}: {message}")]
    FitDivergence {
        /// Model being fitted (e.g. "SVI").
        model: String,
        /// Iterations performed before giving up.
        iterations: usize,
        /// Residual sum of squares at the last iterate.
        residual_ss: f64,
        /// Human readable reason.
        message: String,
    },

    /// Result is not computable (no bracket, singular formula, non-finite value).
    #[error("Numerical degeneracy: {0}")]
    NumericalDegeneracy(String),
}

impl PricingError {
    /// Create a fit divergence error.
    ///
    /// # Arguments
    /// * `model` - Model name
    /// * `iterations` - Iterations performed
    /// * `residual_ss` - Final residual sum of squares
    /// * `message` - Reason for the failure
    pub fn fit_divergence(
        model: impl Into<String>,
        iterations: usize,
        residual_ss: f64,
        message: impl Into<String>,
    ) -> Self {
        PricingError::FitDivergence {
            model: model.into(),
            iterations,
            residual_ss,
            message: message.into(),
        }
    }

    /// Returns true for [`PricingError::InvalidInput`].
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, PricingError::InvalidInput(_))
    }

    /// Returns true for [`PricingError::NoMarketData`].
    pub fn is_no_market_data(&self) -> bool {
        matches!(self, PricingError::NoMarketData(_))
    }

    /// Returns true for [`PricingError::FitDivergence`].
    pub fn is_fit_divergence(&self) -> bool {
        matches!(self, PricingError::FitDivergence { .. })
    }

    /// Returns true for [`PricingError::NumericalDegeneracy`].
    pub fn is_numerical_degeneracy(&self) -> bool {
        matches!(self, PricingError::NumericalDegeneracy(_))
    }
}

/// Root-finding and least-squares solver errors.
///
/// # Examples
/// ```
/// use pricer_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// Derivative near zero in Newton-Raphson.
    #[error("Derivative near zero at x = {x}")]
    DerivativeNearZero {
        /// The x value where derivative was near zero
        x: f64,
    },

    /// Function values at the bracket endpoints have the same sign.
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

impl From<SolverError> for PricingError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::MaxIterationsExceeded { iterations } => PricingError::FitDivergence {
                model: "solver".to_string(),
                iterations,
                residual_ss: f64::NAN,
                message: err.to_string(),
            },
            SolverError::DerivativeNearZero { .. }
            | SolverError::NoBracket { .. }
            | SolverError::NumericalInstability(_) => {
                PricingError::NumericalDegeneracy(err.to_string())
            }
        }
    }
}

/// Date-related errors.
///
/// # Examples
/// ```
/// use pricer_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    #[error("Date parse error: {0}")]
    ParseError(String),
}

impl From<DateError> for PricingError {
    fn from(err: DateError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}
