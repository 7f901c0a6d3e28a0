//! Levenberg-Marquardt nonlinear least-squares solver.
//!
//! This module provides the [`LevenbergMarquardtSolver`] used by smile
//! calibration (SVI, SABR).
//!
//! # Algorithm
//!
//! ```text
//! (J^T J + λI) δ = -J^T r
//! p_{n+1} = Π(p_n + δ)
//! ```
//!
//! where:
//! - `J` is the forward-difference Jacobian of the residuals
//! - `r` is the residual vector
//! - `λ` is the damping factor (shrunk on accepted steps, grown on rejected ones)
//! - `Π` projects the trial point onto the box bounds (identity when unbounded)
//!
//! # Example
//!
//! ```
//! use pricer_core::math::solvers::{LevenbergMarquardtSolver, LMConfig};
//! use pricer_core::traits::calibration::ParameterBounds;
//!
//! // Fit y = a * exp(-b * x), with b constrained to [0, 0.5]
//! let x_data = [0.0, 1.0, 2.0, 3.0];
//! let y_data = [1.0, 0.37, 0.14, 0.05];
//!
//! let residuals = |p: &[f64]| -> Vec<f64> {
//!     x_data.iter().zip(&y_data).map(|(&x, &y)| p[0] * (-p[1] * x).exp() - y).collect()
//! };
//!
//! let bounds = [ParameterBounds::unbounded(), ParameterBounds::new(0.0, 0.5)];
//! let solver = LevenbergMarquardtSolver::new(LMConfig::default());
//! let result = solver.solve_bounded(residuals, vec![1.0, 0.1], &bounds).unwrap();
//!
//! assert!(result.params[1] <= 0.5);
//! ```

use crate::traits::calibration::ParameterBounds;
use crate::types::SolverError;

/// Configuration for Levenberg-Marquardt solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LMConfig {
    /// Convergence tolerance on the residual norm.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Initial damping factor.
    pub initial_lambda: f64,
    /// Factor to increase lambda on rejected step.
    pub lambda_up: f64,
    /// Factor to decrease lambda on accepted step.
    pub lambda_down: f64,
    /// Minimum damping factor.
    pub min_lambda: f64,
    /// Maximum damping factor.
    pub max_lambda: f64,
    /// Tolerance for relative parameter change.
    pub param_tolerance: f64,
    /// Tolerance for relative reduction of the sum of squares on an accepted step.
    pub function_tolerance: f64,
}

impl Default for LMConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 200,
            initial_lambda: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
            min_lambda: 1e-12,
            max_lambda: 1e12,
            param_tolerance: 1e-10,
            function_tolerance: 1e-12,
        }
    }
}

impl LMConfig {
    /// Create a new LM configuration.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }
}

/// Result of Levenberg-Marquardt optimisation.
#[derive(Debug, Clone, PartialEq)]
pub struct LMResult {
    /// Final parameters.
    pub params: Vec<f64>,
    /// Final residual sum of squares.
    pub residual_ss: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether convergence was achieved.
    pub converged: bool,
    /// Final lambda value.
    pub final_lambda: f64,
}

impl LMResult {
    /// Root mean square error over `n_observations` residuals.
    pub fn rmse(&self, n_observations: usize) -> f64 {
        if n_observations == 0 {
            return 0.0;
        }
        (self.residual_ss / n_observations as f64).sqrt()
    }
}

/// Levenberg-Marquardt nonlinear least-squares solver.
///
/// Solves `min_p ||f(p)||²` optionally subject to per-parameter box bounds.
/// Non-convergence within `max_iterations` is reported through
/// [`LMResult::converged`] rather than an error so callers can decide how to
/// surface it.
#[derive(Debug, Clone)]
pub struct LevenbergMarquardtSolver {
    config: LMConfig,
}

impl LevenbergMarquardtSolver {
    /// Create a new LM solver with the given configuration.
    pub fn new(config: LMConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(LMConfig::default())
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &LMConfig {
        &self.config
    }

    /// Solve an unconstrained nonlinear least-squares problem.
    pub fn solve<F>(&self, residuals: F, initial_params: Vec<f64>) -> Result<LMResult, SolverError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        let bounds = vec![ParameterBounds::unbounded(); initial_params.len()];
        self.solve_bounded(residuals, initial_params, &bounds)
    }

    /// Solve a box-constrained nonlinear least-squares problem.
    ///
    /// Every trial point is projected onto `bounds` before the residuals are
    /// evaluated, so the residual function never sees an inadmissible
    /// parameter vector. The initial guess is projected as well.
    ///
    /// # Arguments
    ///
    /// * `residuals` - Function that computes residuals given parameters
    /// * `initial_params` - Initial parameter guess
    /// * `bounds` - One bound per parameter
    ///
    /// # Errors
    ///
    /// * `SolverError::NumericalInstability` - Empty inputs, mismatched bounds,
    ///   or non-finite residuals at the starting point
    pub fn solve_bounded<F>(
        &self,
        residuals: F,
        initial_params: Vec<f64>,
        bounds: &[ParameterBounds],
    ) -> Result<LMResult, SolverError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        let n_params = initial_params.len();
        if n_params == 0 {
            return Err(SolverError::NumericalInstability(
                "Empty parameter vector".to_string(),
            ));
        }
        if bounds.len() != n_params {
            return Err(SolverError::NumericalInstability(format!(
                "{} bounds supplied for {} parameters",
                bounds.len(),
                n_params
            )));
        }

        let mut params = project(&initial_params, bounds);
        let mut lambda = self.config.initial_lambda;

        let mut r = residuals(&params);
        if r.is_empty() {
            return Err(SolverError::NumericalInstability(
                "Empty residual vector".to_string(),
            ));
        }
        let mut ss = sum_of_squares(&r);
        if !ss.is_finite() {
            return Err(SolverError::NumericalInstability(
                "Residuals are not finite at the initial guess".to_string(),
            ));
        }

        for iteration in 0..self.config.max_iterations {
            if ss.sqrt() < self.config.tolerance {
                return Ok(self.result(params, ss, iteration, true, lambda));
            }

            let jacobian = compute_jacobian(&residuals, &params, &r, bounds);

            let delta = match solve_with_active_set(&jacobian, &r, lambda, &params, bounds) {
                Some(d) => d,
                None => {
                    lambda = (lambda * self.config.lambda_up).min(self.config.max_lambda);
                    continue;
                }
            };

            let trial: Vec<f64> = params.iter().zip(&delta).map(|(p, d)| p + d).collect();
            let trial = project(&trial, bounds);

            // Step actually taken after projection
            let step_norm = params
                .iter()
                .zip(&trial)
                .map(|(p, t)| (t - p) * (t - p))
                .sum::<f64>()
                .sqrt();
            let param_norm = params.iter().map(|p| p * p).sum::<f64>().sqrt().max(1.0);
            if step_norm / param_norm < self.config.param_tolerance {
                return Ok(self.result(params, ss, iteration, true, lambda));
            }

            let trial_r = residuals(&trial);
            let trial_ss = sum_of_squares(&trial_r);

            if trial_ss.is_finite() && trial_ss < ss {
                let reduction = (ss - trial_ss) / ss.max(f64::MIN_POSITIVE);
                params = trial;
                r = trial_r;
                ss = trial_ss;
                lambda = (lambda * self.config.lambda_down).max(self.config.min_lambda);
                if reduction < self.config.function_tolerance {
                    return Ok(self.result(params, ss, iteration + 1, true, lambda));
                }
            } else {
                if lambda >= self.config.max_lambda {
                    // No descent direction left inside the box
                    return Ok(self.result(params, ss, iteration + 1, true, lambda));
                }
                lambda = (lambda * self.config.lambda_up).min(self.config.max_lambda);
            }
        }

        Ok(self.result(params, ss, self.config.max_iterations, false, lambda))
    }

    fn result(
        &self,
        params: Vec<f64>,
        residual_ss: f64,
        iterations: usize,
        converged: bool,
        final_lambda: f64,
    ) -> LMResult {
        LMResult {
            params,
            residual_ss,
            iterations,
            converged,
            final_lambda,
        }
    }
}

fn project(params: &[f64], bounds: &[ParameterBounds]) -> Vec<f64> {
    params
        .iter()
        .zip(bounds)
        .map(|(&p, b)| b.clamp(p))
        .collect()
}

/// Forward-difference Jacobian; steps backwards at an upper bound.
fn compute_jacobian<F>(
    residuals: &F,
    params: &[f64],
    r0: &[f64],
    bounds: &[ParameterBounds],
) -> Vec<Vec<f64>>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let n_params = params.len();
    let n_residuals = r0.len();
    let eps = 1e-8;

    let mut jacobian = vec![vec![0.0; n_params]; n_residuals];

    for j in 0..n_params {
        let mut h = eps * params[j].abs().max(1.0);
        if params[j] + h > bounds[j].max {
            h = -h;
        }

        let mut bumped = params.to_vec();
        bumped[j] += h;
        let r_bumped = residuals(&bumped);

        for i in 0..n_residuals {
            let value = r_bumped.get(i).copied().unwrap_or(r0[i]);
            jacobian[i][j] = (value - r0[i]) / h;
        }
    }

    jacobian
}

/// Damped step with parameters pinned at a bound removed from the system.
///
/// A parameter sitting on a bound whose step points outward is held fixed and
/// the remaining parameters are re-solved, so the free ones still move.
fn solve_with_active_set(
    jacobian: &[Vec<f64>],
    residuals: &[f64],
    lambda: f64,
    params: &[f64],
    bounds: &[ParameterBounds],
) -> Option<Vec<f64>> {
    let n_params = params.len();
    let delta = solve_normal_equations(jacobian, residuals, lambda, n_params)?;

    let free: Vec<usize> = (0..n_params)
        .filter(|&i| {
            let pinned_low = params[i] <= bounds[i].min && delta[i] < 0.0;
            let pinned_high = params[i] >= bounds[i].max && delta[i] > 0.0;
            !(pinned_low || pinned_high)
        })
        .collect();
    if free.len() == n_params {
        return Some(delta);
    }
    if free.is_empty() {
        return Some(vec![0.0; n_params]);
    }

    let reduced: Vec<Vec<f64>> = jacobian
        .iter()
        .map(|row| free.iter().map(|&j| row[j]).collect())
        .collect();
    let reduced_delta = solve_normal_equations(&reduced, residuals, lambda, free.len())?;

    let mut full = vec![0.0; n_params];
    for (&j, d) in free.iter().zip(reduced_delta) {
        full[j] = d;
    }
    Some(full)
}

/// Solve (J^T J + λI) δ = -J^T r.
fn solve_normal_equations(
    jacobian: &[Vec<f64>],
    residuals: &[f64],
    lambda: f64,
    n_params: usize,
) -> Option<Vec<f64>> {
    let mut jtj = vec![vec![0.0; n_params]; n_params];
    let mut jtr = vec![0.0; n_params];

    for (row, &res) in jacobian.iter().zip(residuals) {
        for i in 0..n_params {
            jtr[i] -= row[i] * res;
            for j in 0..n_params {
                jtj[i][j] += row[i] * row[j];
            }
        }
    }
    for (i, row) in jtj.iter_mut().enumerate() {
        row[i] += lambda;
    }

    if jtj.iter().flatten().chain(&jtr).any(|v| !v.is_finite()) {
        return None;
    }

    solve_cholesky(&jtj, &jtr)
}

#[inline]
fn sum_of_squares(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

/// Solve Ax = b for symmetric positive definite A.
fn solve_cholesky(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
