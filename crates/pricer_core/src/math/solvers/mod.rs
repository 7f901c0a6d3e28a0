//! Root-finding and optimisation solvers.
//!
//! ## Available Solvers
//!
//! ### Root-Finding
//!
//! - [`NewtonRaphsonSolver`]: Fast quadratic convergence using derivatives
//!   (analytic or central finite difference)
//! - [`BrentSolver`]: Robust bracketing method without derivative requirement
//!
//! ### Optimisation
//!
//! - [`LevenbergMarquardtSolver`]: Box-constrained nonlinear least-squares for
//!   smile calibration
//!
//! ## Configuration
//!
//! Root-finding solvers use [`SolverConfig`]:
//! - `tolerance`: Convergence tolerance (default: 1e-10)
//! - `max_iterations`: Maximum iteration count (default: 100)
//!
//! The LM solver uses [`LMConfig`] with additional damping parameters.
//!
//! ## Examples
//!
//! ```
//! use pricer_core::math::solvers::{LevenbergMarquardtSolver, LMConfig};
//!
//! // Minimise (p[0] - 2)² + (p[1] - 3)²
//! let residuals = |params: &[f64]| -> Vec<f64> {
//!     vec![params[0] - 2.0, params[1] - 3.0]
//! };
//!
//! let solver = LevenbergMarquardtSolver::with_defaults();
//! let result = solver.solve(residuals, vec![0.0, 0.0]).unwrap();
//!
//! assert!(result.converged);
//! assert!((result.params[0] - 2.0).abs() < 1e-6);
//! ```

mod brent;
mod config;
mod levenberg_marquardt;
mod newton_raphson;

pub use brent::BrentSolver;
pub use config::SolverConfig;
pub use levenberg_marquardt::{LMConfig, LMResult, LevenbergMarquardtSolver};
pub use newton_raphson::NewtonRaphsonSolver;
