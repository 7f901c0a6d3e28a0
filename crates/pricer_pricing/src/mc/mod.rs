//! Monte Carlo simulation under geometric Brownian motion.
//!
//! # Architecture
//!
//! ```text
//! MonteCarloEngine
//! ├── MonteCarloConfig  (simulations, steps, seed)
//! ├── NormalGenerator   (injected random stream)
//! └── per path
//!     ├── GbmDynamics::fill_path()
//!     ├── path_payoff()
//!     └── SampleStats (mean, standard error)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use pricer_core::market_data::MarketObservation;
//! use pricer_models::engine::PricingEngine;
//! use pricer_models::instruments::ContractSpec;
//! use pricer_pricing::mc::{MonteCarloConfig, MonteCarloEngine};
//!
//! let config = MonteCarloConfig::builder()
//!     .simulations(10_000)
//!     .steps(1)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! let market = MarketObservation::new(100.0, 0.2, 0.0, 0.05).unwrap();
//! let range = ContractSpec::range_accrual(90.0, 110.0, 1.0, 1.0).unwrap();
//!
//! let v = MonteCarloEngine::new(config).unwrap().price(&range, &market).unwrap();
//! assert!(v.price > 0.0 && v.price < 1.0);
//! ```

mod config;
mod error;
mod paths;
mod payoff;
mod pricer;

pub use config::{
    MonteCarloConfig, MonteCarloConfigBuilder, DEFAULT_SIMULATIONS, DEFAULT_STEPS,
    MAX_SIMULATIONS, MAX_STEPS,
};
pub use error::ConfigError;
pub use paths::{GbmDynamics, PathEnsemble};
pub use payoff::{ensemble_payoffs, path_payoff, SampleStats};
pub use pricer::{price_ensemble, MonteCarloEngine};
