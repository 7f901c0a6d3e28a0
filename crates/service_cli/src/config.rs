//! CLI configuration management
//!
//! Settings come from, in increasing priority: built-in defaults, a TOML
//! file (`pricer.toml` unless `--config` names another), `PRICER_*`
//! environment variables, and command-line flags.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use pricer_core::market_data::MarketObservation;
use pricer_core::types::PricingError;
use pricer_pricing::mc::{self, MonteCarloConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default configuration file, read when present.
pub const DEFAULT_CONFIG_FILE: &str = "pricer.toml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid output format: {0}. Must be one of: table, json")]
    InvalidOutputFormat(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable {name}={value}: {reason}")]
    EnvError {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Log levels accepted by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidOutputFormat(s.to_string())),
        }
    }
}

/// Market snapshot used when a command omits market flags
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct MarketDefaults {
    pub spot: Option<f64>,
    pub volatility: Option<f64>,
    #[serde(default)]
    pub dividend_yield: f64,
    pub rate: Option<f64>,
}

impl MarketDefaults {
    /// Validated observation, when every field is present.
    pub fn observation(&self) -> Option<Result<MarketObservation, PricingError>> {
        Some(MarketObservation::new(
            self.spot?,
            self.volatility?,
            self.dividend_yield,
            self.rate?,
        ))
    }
}

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CliConfig {
    pub log_level: LogLevel,
    pub binomial_steps: usize,
    pub mc_simulations: usize,
    pub mc_steps: usize,
    pub mc_seed: Option<u64>,
    pub output_format: OutputFormat,
    pub market: Option<MarketDefaults>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            binomial_steps: 100,
            mc_simulations: mc::DEFAULT_SIMULATIONS,
            mc_steps: mc::DEFAULT_STEPS,
            mc_seed: None,
            output_format: OutputFormat::Table,
            market: None,
        }
    }
}

/// Command-line overrides; `None` leaves the lower layers in place.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<LogLevel>,
    pub verbose: bool,
    pub output_format: Option<OutputFormat>,
    pub binomial_steps: Option<usize>,
    pub mc_simulations: Option<usize>,
    pub mc_steps: Option<usize>,
    pub mc_seed: Option<u64>,
}

impl CliConfig {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Apply `PRICER_*` overrides found through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("PRICER_LOG_LEVEL") {
            self.log_level = value.parse::<LogLevel>()?;
        }
        if let Some(value) = lookup("PRICER_OUTPUT_FORMAT") {
            self.output_format = value.parse::<OutputFormat>()?;
        }
        if let Some(value) = lookup("PRICER_BINOMIAL_STEPS") {
            self.binomial_steps = parse_env("PRICER_BINOMIAL_STEPS", value)?;
        }
        if let Some(value) = lookup("PRICER_MC_SIMULATIONS") {
            self.mc_simulations = parse_env("PRICER_MC_SIMULATIONS", value)?;
        }
        if let Some(value) = lookup("PRICER_MC_STEPS") {
            self.mc_steps = parse_env("PRICER_MC_STEPS", value)?;
        }
        if let Some(value) = lookup("PRICER_MC_SEED") {
            self.mc_seed = Some(parse_env("PRICER_MC_SEED", value)?);
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliOverrides) {
        if let Some(level) = cli.log_level {
            self.log_level = level;
        } else if cli.verbose {
            self.log_level = LogLevel::Debug;
        }
        if let Some(format) = cli.output_format {
            self.output_format = format;
        }
        if let Some(steps) = cli.binomial_steps {
            self.binomial_steps = steps;
        }
        if let Some(sims) = cli.mc_simulations {
            self.mc_simulations = sims;
        }
        if let Some(steps) = cli.mc_steps {
            self.mc_steps = steps;
        }
        if cli.mc_seed.is_some() {
            self.mc_seed = cli.mc_seed;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.binomial_steps == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "binomial_steps",
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(Err(e)) = self.market.as_ref().and_then(MarketDefaults::observation) {
            return Err(ConfigError::InvalidSetting {
                name: "market",
                reason: e.to_string(),
            });
        }
        self.monte_carlo()
            .map(|_| ())
            .map_err(|e| ConfigError::InvalidSetting {
                name: "mc",
                reason: e.to_string(),
            })
    }

    /// Monte Carlo settings
    pub fn monte_carlo(&self) -> Result<MonteCarloConfig, mc::ConfigError> {
        MonteCarloConfig::builder()
            .simulations(self.mc_simulations)
            .steps(self.mc_steps)
            .maybe_seed(self.mc_seed)
            .build()
    }
}

fn parse_env<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::EnvError {
        name,
        reason: e.to_string(),
        value,
    })
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
///
/// A missing default file is skipped; a missing file named with `--config`
/// is an error.
pub fn build_config<F>(
    config_file: Option<&Path>,
    lookup: F,
    cli: &CliOverrides,
) -> Result<CliConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match config_file {
        Some(path) => CliConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            CliConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => CliConfig::default(),
    };

    config.apply_env(lookup)?;
    config.merge_with_cli(cli);
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.binomial_steps, 100);
        assert_eq!(config.mc_simulations, 10_000);
        assert_eq!(config.mc_steps, 252);
        assert_eq!(config.mc_seed, None);
        assert_eq!(config.output_format, OutputFormat::Table);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("Warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CliConfig::from_toml(
            r#"
            binomial_steps = 500
            output_format = "json"

            [market]
            spot = 100.0
            volatility = 0.2
            rate = 0.05
            "#,
        )
        .unwrap();
        assert_eq!(config.binomial_steps, 500);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.mc_steps, 252);
        let market = config.market.unwrap().observation().unwrap().unwrap();
        assert_eq!(market.dividend_yield(), 0.0);
    }

    #[test]
    fn test_bad_toml_is_file_error() {
        let err = CliConfig::from_toml("binomial_steps = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::FileError(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = CliConfig::from_toml("mc_simulations = 500").unwrap();
        config
            .apply_env(env(&[
                ("PRICER_MC_SIMULATIONS", "2000"),
                ("PRICER_MC_SEED", "7"),
                ("PRICER_LOG_LEVEL", "warn"),
            ]))
            .unwrap();
        assert_eq!(config.mc_simulations, 2000);
        assert_eq!(config.mc_seed, Some(7));
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = CliConfig::default();
        let err = config
            .apply_env(env(&[("PRICER_MC_STEPS", "ten")]))
            .unwrap_err();
        assert!(err.to_string().contains("PRICER_MC_STEPS"));
    }

    #[test]
    fn test_env_log_level_and_format() {
        let mut config = CliConfig::default();
        config
            .apply_env(env(&[
                ("PRICER_LOG_LEVEL", "TRACE"),
                ("PRICER_OUTPUT_FORMAT", "Json"),
            ]))
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.output_format, OutputFormat::Json);

        let err = config
            .apply_env(env(&[("PRICER_OUTPUT_FORMAT", "xml")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOutputFormat(_)));
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config = CliConfig::default();
        config
            .apply_env(env(&[
                ("PRICER_BINOMIAL_STEPS", "50"),
                ("PRICER_OUTPUT_FORMAT", "json"),
            ]))
            .unwrap();
        config.merge_with_cli(&CliOverrides {
            binomial_steps: Some(800),
            verbose: true,
            ..Default::default()
        });
        assert_eq!(config.binomial_steps, 800);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_explicit_log_level_beats_verbose() {
        let mut config = CliConfig::default();
        config.merge_with_cli(&CliOverrides {
            log_level: Some(LogLevel::Error),
            verbose: true,
            ..Default::default()
        });
        assert_eq!(config.log_level, LogLevel::Error);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = build_config(
            Some(Path::new("/nonexistent/pricer.toml")),
            env(&[]),
            &CliOverrides::default(),
        );
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }

    #[test]
    fn test_out_of_range_simulations_rejected() {
        let result = build_config(
            None,
            env(&[("PRICER_MC_SIMULATIONS", "0")]),
            &CliOverrides::default(),
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidSetting { name: "mc", .. })
        ));
    }

    #[test]
    fn test_invalid_market_block_rejected() {
        let mut config = CliConfig::from_toml(
            r#"
            [market]
            spot = -5.0
            volatility = 0.2
            rate = 0.05
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSetting { name: "market", .. })
        ));
        config.market = Some(MarketDefaults {
            spot: None,
            volatility: Some(0.2),
            dividend_yield: 0.0,
            rate: None,
        });
        assert!(config.validate().is_ok());
    }
}
