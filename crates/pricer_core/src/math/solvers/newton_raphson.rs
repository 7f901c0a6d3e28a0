//! Newton-Raphson root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Newton-Raphson root finder.
///
/// Uses `x_{n+1} = x_n - f(x_n) / f'(x_n)`. Converges quadratically near a
/// root but may fail when the derivative vanishes or the guess is poor.
/// Yield-to-maturity solving starts it from a fixed 5% guess.
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
///
/// // Solve x² - 2 = 0 (find √2)
/// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
///
/// let f = |x: f64| x * x - 2.0;
/// let f_prime = |x: f64| 2.0 * x;
///
/// let root = solver.find_root(f, f_prime, 1.0).unwrap();
/// assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> NewtonRaphsonSolver<T> {
    /// Create a new Newton-Raphson solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Find a root of `f` using explicit derivative `f_prime`.
    ///
    /// # Arguments
    ///
    /// * `f` - Function to find root of
    /// * `f_prime` - Derivative of f
    /// * `x0` - Initial guess
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - Root where `|f(x)| < tolerance`
    /// * `Err(SolverError::MaxIterationsExceeded)` - Failed to converge
    /// * `Err(SolverError::DerivativeNearZero)` - Derivative too small
    /// * `Err(SolverError::NumericalInstability)` - Iterate became non-finite
    pub fn find_root<F, G>(&self, f: F, f_prime: G, x0: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
        G: Fn(T) -> T,
    {
        let mut x = x0;
        let tiny = T::from(1e-30).unwrap_or_else(T::min_positive_value);

        for _ in 0..self.config.max_iterations {
            let f_val = f(x);
            if !f_val.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "function value is not finite".to_string(),
                ));
            }
            if f_val.abs() < self.config.tolerance {
                return Ok(x);
            }

            let f_prime_val = f_prime(x);
            if f_prime_val.abs() < tiny || !f_prime_val.is_finite() {
                return Err(SolverError::DerivativeNearZero {
                    x: x.to_f64().unwrap_or(f64::NAN),
                });
            }

            let step = f_val / f_prime_val;
            x = x - step;

            if !x.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "Newton iteration produced non-finite value".to_string(),
                ));
            }
            // Step below tolerance counts as converged
            if step.abs() < self.config.tolerance * (T::one() + x.abs()) {
                return Ok(x);
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Find a root of `f` using a central finite-difference derivative.
    ///
    /// The bump is `1e-7 * max(|x|, 1)`.
    ///
    /// # Example
    ///
    /// ```
    /// use pricer_core::math::solvers::NewtonRaphsonSolver;
    ///
    /// let solver = NewtonRaphsonSolver::<f64>::with_defaults();
    /// let root = solver.find_root_numeric(|x| x.exp() - 2.0, 0.0).unwrap();
    /// assert!((root - 2.0_f64.ln()).abs() < 1e-9);
    /// ```
    pub fn find_root_numeric<F>(&self, f: F, x0: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let bump = T::from(1e-7).unwrap_or_else(T::epsilon);
        let two = T::one() + T::one();
        let derivative = |x: T| {
            let h = bump * x.abs().max(T::one());
            (f(x + h) - f(x - h)) / (two * h)
        };
        self.find_root(&f, derivative, x0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_two() {
        let solver = NewtonRaphsonSolver::new(SolverConfig::default());
        let root = solver
            .find_root(|x: f64| x * x - 2.0, |x: f64| 2.0 * x, 1.0)
            .unwrap();
        assert_relative_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_derivative() {
        let solver = NewtonRaphsonSolver::<f64>::with_defaults();
        let result = solver.find_root(|x: f64| x * x + 1.0, |x: f64| 2.0 * x, 0.0);
        assert!(matches!(result, Err(SolverError::DerivativeNearZero { .. })));
    }

    #[test]
    fn test_max_iterations() {
        // x² + 1 has no real root; Newton oscillates
        let solver = NewtonRaphsonSolver::new(SolverConfig::new(1e-12, 20));
        let result = solver.find_root(|x: f64| x * x + 1.0, |x: f64| 2.0 * x, 0.5);
        assert!(result.is_err());
    }

    #[test]
    fn test_numeric_derivative_matches_analytic() {
        let solver = NewtonRaphsonSolver::<f64>::with_defaults();
        let f = |x: f64| x * x * x - x - 2.0;
        let numeric = solver.find_root_numeric(f, 1.5).unwrap();
        let analytic = solver.find_root(f, |x| 3.0 * x * x - 1.0, 1.5).unwrap();
        assert_relative_eq!(numeric, analytic, epsilon = 1e-9);
    }

    #[test]
    fn test_discount_factor_root() {
        // 100 / (1 + y)^5 = 80 → y = 1.25^(1/5) - 1
        let solver = NewtonRaphsonSolver::<f64>::with_defaults();
        let root = solver
            .find_root_numeric(|y| 100.0 / (1.0 + y).powi(5) - 80.0, 0.05)
            .unwrap();
        assert_relative_eq!(root, 1.25_f64.powf(0.2) - 1.0, epsilon = 1e-9);
    }
}
