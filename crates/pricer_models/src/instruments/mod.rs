//! Contract definitions.
//!
//! - [`PayoffKind`] / [`OptionType`]: What the contract pays
//! - [`ExerciseStyle`] / [`Position`]: When it can be exercised and which side is held
//! - [`ContractSpec`]: The immutable bundle engines price
//! - [`InstrumentError`]: Construction failures, mapped to `PricingError::InvalidInput`

mod contract;
mod error;
mod exercise;
mod payoff;

pub use contract::ContractSpec;
pub use error::InstrumentError;
pub use exercise::{ExerciseStyle, Position};
pub use payoff::{OptionType, PayoffKind};
