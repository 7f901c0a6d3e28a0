//! Solver configuration types.

use num_traits::Float;

/// Configuration for root-finding algorithms.
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert_eq!(config.max_iterations, 100);
///
/// let tight = SolverConfig::new(1e-12, 200);
/// assert_eq!(tight.max_iterations, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Convergence tolerance on both `|f(x)|` and the bracket/step width.
    pub tolerance: T,

    /// Maximum number of iterations before giving up.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Tolerance 1e-10, 100 iterations.
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-10).unwrap_or_else(T::epsilon),
            max_iterations: 100,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a configuration with the given tolerance and iteration cap.
    ///
    /// Non-positive tolerances fall back to machine epsilon and a zero
    /// iteration cap is raised to one.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        let tolerance = if tolerance > T::zero() {
            tolerance
        } else {
            T::epsilon()
        };
        Self {
            tolerance,
            max_iterations: max_iterations.max(1),
        }
    }
}
