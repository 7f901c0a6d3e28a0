//! # Pricer Models (L2: Business Logic)
//!
//! Contracts and the deterministic pricing methods built on them.
//!
//! This crate provides:
//! - Contract definitions (payoff kind, exercise style, position)
//! - Black-Scholes-Merton closed form, Greeks and implied volatility
//! - Cox-Ross-Rubinstein equity lattices with early exercise
//! - Short-rate lattices for zero-coupon bonds, bond options, caplets
//!   and floorlets
//! - SVI and SABR smile calibration
//! - Flat-or-smile volatility selection
//! - Coupon bond analytics
//! - The [`engine::PricingEngine`] interface shared with the Monte Carlo
//!   engine in `pricer_pricing`
//!
//! ## Design Principles
//!
//! - **Tagged payoffs**: one [`instruments::PayoffKind`] enum consumed by
//!   every engine instead of a type per instrument
//! - **One backward induction**: every lattice instrument is a terminal
//!   payoff plus a continuation rule fed to [`lattice::walk_back`]
//! - **Explicit market data**: engines take a
//!   [`pricer_core::market_data::MarketObservation`] value and never fetch

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod bonds;
pub mod calibration;
pub mod engine;
pub mod instruments;
pub mod lattice;
pub mod volatility;
