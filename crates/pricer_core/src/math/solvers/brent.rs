//! Brent's method root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Brent's method root finder.
///
/// Combines bisection, secant and inverse quadratic interpolation. Needs no
/// derivative and always converges for a continuous function on a valid
/// bracket, which is why implied volatility inversion uses it.
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
///
/// // Solve x³ - x - 2 = 0 in bracket [1, 2]
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let root = solver.find_root(f, 1.0, 2.0).unwrap();
/// assert!(f(root).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Create a new Brent solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Solver configuration in use.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Find a root of `f` in the bracket `[a, b]`.
    ///
    /// # Arguments
    ///
    /// * `f` - Function to find root of
    /// * `a` - Left bracket endpoint
    /// * `b` - Right bracket endpoint
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - Root where `|f(x)| < tolerance` or the bracket has collapsed
    /// * `Err(SolverError::NoBracket)` - `f(a)` and `f(b)` have the same sign
    /// * `Err(SolverError::NumericalInstability)` - `f` returned a non-finite value
    /// * `Err(SolverError::MaxIterationsExceeded)` - Failed to converge
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let mut a = a;
        let mut b = b;
        let mut fa = f(a);
        let mut fb = f(b);

        if !fa.is_finite() || !fb.is_finite() {
            return Err(SolverError::NumericalInstability(
                "non-finite function value at bracket endpoint".to_string(),
            ));
        }
        if fa == T::zero() {
            return Ok(a);
        }
        if fb == T::zero() {
            return Ok(b);
        }
        if fa * fb > T::zero() {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        let two = T::one() + T::one();
        let three = two + T::one();
        let half = T::one() / two;
        let tol = self.config.tolerance;

        // c always brackets the root together with b
        let mut c = b;
        let mut fc = fb;
        let mut d = b - a;
        let mut e = d;

        for _ in 0..self.config.max_iterations {
            if (fb > T::zero()) == (fc > T::zero()) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol1 = two * T::epsilon() * b.abs() + half * tol;
            let xm = half * (c - b);
            if xm.abs() <= tol1 || fb.abs() < tol {
                return Ok(b);
            }

            if e.abs() >= tol1 && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (mut p, mut q);
                if a == c {
                    // secant
                    p = two * xm * s;
                    q = T::one() - s;
                } else {
                    // inverse quadratic interpolation
                    let qq = fa / fc;
                    let r = fb / fc;
                    p = s * (two * xm * qq * (qq - r) - (b - a) * (r - T::one()));
                    q = (qq - T::one()) * (r - T::one()) * (s - T::one());
                }
                if p > T::zero() {
                    q = -q;
                }
                p = p.abs();
                let min1 = three * xm * q - (tol1 * q).abs();
                let min2 = (e * q).abs();
                if two * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = xm;
                    e = d;
                }
            } else {
                d = xm;
                e = d;
            }

            a = b;
            fa = fb;
            if d.abs() > tol1 {
                b = b + d;
            } else {
                b = b + if xm > T::zero() { tol1 } else { -tol1 };
            }
            fb = f(b);
            if !fb.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "non-finite function value inside bracket".to_string(),
                ));
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_two() {
        let solver = BrentSolver::new(SolverConfig::default());
        let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
        assert_relative_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn test_cubic() {
        let solver = BrentSolver::<f64>::with_defaults();
        let f = |x: f64| x * x * x - x - 2.0;
        let root = solver.find_root(f, 1.0, 2.0).unwrap();
        assert!(f(root).abs() < 1e-8);
    }

    #[test]
    fn test_reversed_bracket() {
        let solver = BrentSolver::<f64>::with_defaults();
        let root = solver.find_root(|x: f64| x.cos() - x, 1.0, 0.0).unwrap();
        assert_relative_eq!(root, 0.739_085_133_215_160_6, epsilon = 1e-9);
    }

    #[test]
    fn test_root_at_endpoint() {
        let solver = BrentSolver::<f64>::with_defaults();
        assert_eq!(solver.find_root(|x: f64| x - 1.0, 1.0, 3.0).unwrap(), 1.0);
    }

    #[test]
    fn test_no_bracket() {
        let solver = BrentSolver::<f64>::with_defaults();
        let result = solver.find_root(|x: f64| x * x + 1.0, -1.0, 1.0);
        assert!(matches!(result, Err(SolverError::NoBracket { .. })));
    }

    #[test]
    fn test_non_finite_endpoint() {
        let solver = BrentSolver::<f64>::with_defaults();
        let result = solver.find_root(|x: f64| 1.0 / x, 0.0, 1.0);
        assert!(matches!(result, Err(SolverError::NumericalInstability(_))));
    }

    #[test]
    fn test_steep_function() {
        // exp-shaped functions resemble option price minus target
        let solver = BrentSolver::<f64>::with_defaults();
        let root = solver
            .find_root(|x: f64| (10.0 * x).exp() - 5.0, 0.0, 1.0)
            .unwrap();
        assert_relative_eq!(root, 5.0_f64.ln() / 10.0, epsilon = 1e-9);
    }
}
