//! Property tests for the root finders.

use pricer_core::math::solvers::{BrentSolver, NewtonRaphsonSolver, SolverConfig};
use proptest::prelude::*;

proptest! {
    /// Brent finds the root of any monotone cubic bracketed by [-100, 100].
    #[test]
    fn brent_recovers_cubic_root(root in -50.0f64..50.0, slope in 0.1f64..10.0) {
        let f = |x: f64| (x - root).powi(3) + slope * (x - root);
        let solver = BrentSolver::new(SolverConfig::new(1e-12, 200));
        let found = solver.find_root(f, -100.0, 100.0).unwrap();
        prop_assert!((found - root).abs() < 1e-6);
    }

    /// Newton with a numerical derivative agrees with the closed-form root of
    /// a discounting equation.
    #[test]
    fn newton_recovers_discount_yield(y in 0.0f64..0.2, n in 1i32..30) {
        let target = 100.0 / (1.0 + y).powi(n);
        let solver = NewtonRaphsonSolver::<f64>::with_defaults();
        let found = solver
            .find_root_numeric(|r| 100.0 / (1.0 + r).powi(n) - target, 0.05)
            .unwrap();
        prop_assert!((found - y).abs() < 1e-7);
    }
}
