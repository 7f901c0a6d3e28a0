//! Monte Carlo configuration errors.

use pricer_core::types::PricingError;
use thiserror::Error;

use super::config::{MAX_SIMULATIONS, MAX_STEPS};

/// Rejected Monte Carlo settings.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Simulation count outside [1, 10_000_000].
    #[error("Invalid simulation count {0}: must be in range [1, {max}]", max = MAX_SIMULATIONS)]
    InvalidSimulationCount(usize),
    /// Step count outside [1, 10_000].
    #[error("Invalid step count {0}: must be in range [1, {max}]", max = MAX_STEPS)]
    InvalidStepCount(usize),
    /// A required setting was not supplied.
    #[error("Missing parameter '{0}'")]
    MissingParameter(&'static str),
}

impl From<ConfigError> for PricingError {
    fn from(err: ConfigError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}
