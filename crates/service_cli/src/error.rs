//! CLI error types.

use std::path::PathBuf;

use pricer_core::types::{DateError, PricingError};
use pricer_models::instruments::InstrumentError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced to the user by the `pricer` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Monte Carlo settings out of range.
    #[error("Monte Carlo settings: {0}")]
    MonteCarlo(#[from] pricer_pricing::mc::ConfigError),

    /// Pricing or calibration failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Contract terms rejected.
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    /// Date parsing failed.
    #[error(transparent)]
    Date(#[from] DateError),

    /// A command-line value is missing or inconsistent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// An input file is malformed.
    #[error("Malformed input in {path}: {message}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// JSON output failed.
    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
