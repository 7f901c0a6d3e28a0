//! Binomial lattices.
//!
//! - [`TriangularLattice`]: Flat `(step, downs)` storage
//! - [`walk_back`]: The single backward induction routine
//! - [`EquityLattice`]: Cox-Ross-Rubinstein tree for European and American
//!   vanilla options
//! - [`ShortRateTree`]: Multiplicative short-rate tree for zero-coupon
//!   bonds, bond options, caplets and floorlets
//!
//! Every valuation keeps its lattices so callers can inspect or print them.

mod crr;
mod short_rate;
mod triangle;
mod walker;

pub use crr::{binomial_price, intrinsic_lattice, CrrParameters, EquityLattice};
pub use short_rate::{RateOptionKind, ShortRateTree};
pub use triangle::TriangularLattice;
pub use walker::{walk_back, ExerciseFn};
