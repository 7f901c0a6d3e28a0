//! # Pricer Pricing (L3: Simulation Engines)
//!
//! Path simulation and cross-model checks on top of `pricer_models`.
//!
//! This crate provides:
//! - [`rng`]: the [`rng::NormalGenerator`] seam through which every
//!   simulation draws its shocks, with a seeded default generator
//! - [`mc`]: GBM path ensembles and the Monte Carlo
//!   [`pricer_models::engine::PricingEngine`] for European, digital, range
//!   accrual and Asian payoffs
//! - [`compare`]: closed form vs lattice vs Monte Carlo on one contract,
//!   run in parallel
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::market_data::MarketObservation;
//! use pricer_models::engine::PricingEngine;
//! use pricer_models::instruments::{ContractSpec, PayoffKind};
//! use pricer_pricing::mc::{MonteCarloConfig, MonteCarloEngine};
//! use pricer_pricing::rng::PricerRng;
//!
//! let config = MonteCarloConfig::builder()
//!     .simulations(5_000)
//!     .steps(52)
//!     .build()
//!     .unwrap();
//! let market = MarketObservation::new(100.0, 0.3, 0.0, 0.04).unwrap();
//! let asian = ContractSpec::new(PayoffKind::AsianPut, 100.0, 1.0).unwrap();
//!
//! let mut engine = MonteCarloEngine::with_generator(config, PricerRng::from_seed(5)).unwrap();
//! let v = engine.price(&asian, &market).unwrap();
//! assert!(v.price > 0.0);
//! assert!(v.std_error.is_some());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod compare;
pub mod mc;
pub mod rng;
