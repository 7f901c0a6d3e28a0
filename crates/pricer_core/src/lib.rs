//! # pricer_core: Numerical Foundation for the Pricer Workspace
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Error taxonomy: `PricingError`, `SolverError`, `DateError` (`types::error`)
//! - Time types: `Date`, `DayCountConvention` (`types::time`)
//! - Root finders and bounded least squares (`math::solvers`)
//! - Historical volatility estimation (`math::statistics`)
//! - Market inputs and the market-data collaborator trait (`market_data`)
//! - Least-squares calibration framework (`traits::calibration`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal
//! external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Date arithmetic
//! - thiserror: Error derivation
//! - tracing: Calibration diagnostics
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::MarketObservation;
//! use pricer_core::math::solvers::BrentSolver;
//! use pricer_core::types::{Date, DayCountConvention};
//!
//! let market = MarketObservation::new(100.0, 0.2, 0.0, 0.05).unwrap();
//! assert_eq!(market.rate(), 0.05);
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let end = Date::from_ymd(2024, 7, 1).unwrap();
//! let yf = DayCountConvention::Actual360.year_fraction(start, end);
//! assert!((yf - 182.0 / 360.0).abs() < 1e-12);
//!
//! let root = BrentSolver::<f64>::with_defaults()
//!     .find_root(|x| x * x - 4.0, 0.0, 5.0)
//!     .unwrap();
//! assert!((root - 2.0).abs() < 1e-9);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for errors, dates and market data

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod traits;
pub mod types;
