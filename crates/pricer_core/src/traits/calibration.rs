//! Calibration traits and result types.
//!
//! This module defines the core abstractions for smile calibration:
//! - [`ParameterBounds`]: Box constraint on a single parameter
//! - [`CalibrationConfig`]: Iteration cap and tolerances
//! - [`CalibrationResult`]: Fitted parameters plus fit diagnostics
//! - [`Calibrator`]: A least-squares fit of a parametric model to quotes
//!
//! A calibrator is a pure function from a parameter vector to residuals.
//! [`Calibrator::calibrate`] runs the bounded Levenberg-Marquardt solver from
//! every starting point the model proposes and returns the best converged
//! fit as a new value; nothing is mutated during the search.
//!
//! # Example
//!
//! ```
//! use pricer_core::traits::calibration::{
//!     Calibrator, CalibrationConfig, ParameterBounds,
//! };
//!
//! // Fit a constant level to noisy observations
//! struct Level(Vec<f64>);
//!
//! impl Calibrator for Level {
//!     type Params = f64;
//!
//!     fn model_name(&self) -> &'static str { "level" }
//!     fn bounds(&self) -> Vec<ParameterBounds> { vec![ParameterBounds::non_negative()] }
//!     fn initial_guesses(&self) -> Vec<Vec<f64>> { vec![vec![0.0]] }
//!     fn residuals(&self, p: &[f64]) -> Vec<f64> {
//!         self.0.iter().map(|y| p[0] - y).collect()
//!     }
//!     fn params_from_slice(&self, p: &[f64]) -> f64 { p[0] }
//! }
//!
//! let fit = Level(vec![1.0, 2.0, 3.0]).calibrate(&CalibrationConfig::default()).unwrap();
//! assert!((fit.params - 2.0).abs() < 1e-6);
//! ```

use std::fmt;

use tracing::{debug, warn};

use crate::math::solvers::{LMConfig, LMResult, LevenbergMarquardtSolver};
use crate::types::PricingError;

/// Configuration for a calibration run.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationConfig {
    /// Maximum optimiser iterations per starting point.
    pub max_iterations: usize,
    /// Convergence tolerance for the residual norm.
    pub tolerance: f64,
    /// Tolerance for relative parameter change.
    pub param_tolerance: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-10,
            param_tolerance: 1e-10,
        }
    }
}

impl CalibrationConfig {
    /// Create a new configuration with specified tolerance and iterations.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    fn lm_config(&self) -> LMConfig {
        LMConfig {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            param_tolerance: self.param_tolerance,
            ..LMConfig::default()
        }
    }
}

/// Successful calibration.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationResult<P> {
    /// Fitted parameters.
    pub params: P,
    /// Optimiser iterations used by the winning start.
    pub iterations: usize,
    /// Residual sum of squares at the fitted parameters.
    pub residual_ss: f64,
    /// Residuals (model - market) at the fitted parameters.
    pub residuals: Vec<f64>,
}

impl<P> CalibrationResult<P> {
    /// Root mean square error of the fit.
    pub fn rmse(&self) -> f64 {
        if self.residuals.is_empty() {
            return self.residual_ss.sqrt();
        }
        (self.residual_ss / self.residuals.len() as f64).sqrt()
    }
}

impl<P: fmt::Debug> fmt::Display for CalibrationResult<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CalibrationResult {{ params: {:?}, iterations: {}, RMSE: {:.6e} }}",
            self.params,
            self.iterations,
            self.rmse()
        )
    }
}

/// Bounds for a single parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterBounds {
    /// Minimum allowed value.
    pub min: f64,
    /// Maximum allowed value.
    pub max: f64,
}

impl ParameterBounds {
    /// Create new bounds.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Bounds for a non-negative parameter.
    pub fn non_negative() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }

    /// Bounds for a parameter in [0, 1].
    pub fn unit_interval() -> Self {
        Self { min: 0.0, max: 1.0 }
    }

    /// Bounds for a correlation in [-1, 1].
    pub fn correlation() -> Self {
        Self {
            min: -1.0,
            max: 1.0,
        }
    }

    /// No bounds.
    pub fn unbounded() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    /// Check if a value is within bounds. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value to bounds.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// A parametric model fitted to market quotes by least squares.
///
/// Implementors only describe the problem: parameter bounds, starting points
/// and the residual function. The provided [`Calibrator::calibrate`] runs the
/// optimisation.
pub trait Calibrator {
    /// Typed parameter tuple produced by a successful fit.
    type Params;

    /// Model name used in errors and logs.
    fn model_name(&self) -> &'static str;

    /// One bound per parameter, in vector order.
    fn bounds(&self) -> Vec<ParameterBounds>;

    /// Starting points for the optimiser; at least one.
    fn initial_guesses(&self) -> Vec<Vec<f64>>;

    /// Residuals (model - market) for a parameter vector.
    fn residuals(&self, params: &[f64]) -> Vec<f64>;

    /// Convert an admissible parameter vector into the typed tuple.
    fn params_from_slice(&self, params: &[f64]) -> Self::Params;

    /// Fit the model.
    ///
    /// Every starting point is tried; the converged run with the smallest
    /// residual sum of squares wins.
    ///
    /// # Errors
    ///
    /// `PricingError::FitDivergence` when no start converges, or when the
    /// winning parameters are non-finite or outside their bounds.
    fn calibrate(
        &self,
        config: &CalibrationConfig,
    ) -> Result<CalibrationResult<Self::Params>, PricingError> {
        let bounds = self.bounds();
        let solver = LevenbergMarquardtSolver::new(config.lm_config());
        let residual_fn = |p: &[f64]| self.residuals(p);

        let mut best: Option<LMResult> = None;
        let mut last_failure: Option<(usize, f64, String)> = None;

        for guess in self.initial_guesses() {
            match solver.solve_bounded(residual_fn, guess, &bounds) {
                Ok(run) if run.converged && run.residual_ss.is_finite() => {
                    debug!(
                        model = self.model_name(),
                        iterations = run.iterations,
                        residual_ss = run.residual_ss,
                        "calibration start converged"
                    );
                    let better = best.as_ref().map_or(true, |b| run.residual_ss < b.residual_ss);
                    if better {
                        best = Some(run);
                    }
                }
                Ok(run) => {
                    last_failure = Some((
                        run.iterations,
                        run.residual_ss,
                        "optimiser did not converge".to_string(),
                    ));
                }
                Err(err) => {
                    last_failure = Some((0, f64::NAN, err.to_string()));
                }
            }
        }

        let Some(run) = best else {
            let (iterations, residual_ss, message) = last_failure
                .unwrap_or((0, f64::NAN, "no starting point supplied".to_string()));
            warn!(model = self.model_name(), %message, "calibration failed");
            return Err(PricingError::fit_divergence(
                self.model_name(),
                iterations,
                residual_ss,
                message,
            ));
        };

        let admissible = run
            .params
            .iter()
            .zip(&bounds)
            .all(|(&p, b)| p.is_finite() && b.contains(p));
        if !admissible {
            warn!(model = self.model_name(), params = ?run.params, "fit left its bounds");
            return Err(PricingError::fit_divergence(
                self.model_name(),
                run.iterations,
                run.residual_ss,
                format!("parameters {:?} violate bounds", run.params),
            ));
        }

        let residuals = self.residuals(&run.params);
        Ok(CalibrationResult {
            params: self.params_from_slice(&run.params),
            iterations: run.iterations,
            residual_ss: run.residual_ss,
            residuals,
        })
    }
}
