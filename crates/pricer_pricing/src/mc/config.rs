//! Monte Carlo simulation configuration.

use super::error::ConfigError;

/// Maximum number of simulated paths.
pub const MAX_SIMULATIONS: usize = 10_000_000;

/// Maximum number of time steps per path.
pub const MAX_STEPS: usize = 10_000;

/// Default number of simulated paths.
pub const DEFAULT_SIMULATIONS: usize = 10_000;

/// Default number of time steps (one per trading day over a year).
pub const DEFAULT_STEPS: usize = 252;

/// Validated simulation settings.
///
/// Use [`MonteCarloConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloConfig;
///
/// let config = MonteCarloConfig::builder()
///     .simulations(10_000)
///     .steps(252)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.simulations(), 10_000);
/// assert_eq!(config.steps(), 252);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonteCarloConfig {
    simulations: usize,
    steps: usize,
    seed: Option<u64>,
}

impl MonteCarloConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Number of independent paths.
    #[inline]
    pub fn simulations(&self) -> usize {
        self.simulations
    }

    /// Number of time steps per path.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Seed for the default generator; `None` draws one from entropy.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Copy with a different seed.
    #[inline]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `simulations` is 0 or greater than 10,000,000
    /// - `steps` is 0 or greater than 10,000
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulations == 0 || self.simulations > MAX_SIMULATIONS {
            return Err(ConfigError::InvalidSimulationCount(self.simulations));
        }
        if self.steps == 0 || self.steps > MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(self.steps));
        }
        Ok(())
    }
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            simulations: DEFAULT_SIMULATIONS,
            steps: DEFAULT_STEPS,
            seed: None,
        }
    }
}

/// Builder for [`MonteCarloConfig`].
///
/// Both counts must be supplied; the seed is optional.
#[derive(Clone, Debug, Default)]
pub struct MonteCarloConfigBuilder {
    simulations: Option<usize>,
    steps: Option<usize>,
    seed: Option<u64>,
}

impl MonteCarloConfigBuilder {
    /// Sets the number of paths, in [1, 10_000_000].
    #[inline]
    pub fn simulations(mut self, simulations: usize) -> Self {
        self.simulations = Some(simulations);
        self
    }

    /// Sets the number of time steps, in [1, 10_000].
    #[inline]
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets or clears the seed.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingParameter` when a count was not set, or the
    /// range errors of [`MonteCarloConfig::validate`].
    pub fn build(self) -> Result<MonteCarloConfig, ConfigError> {
        let simulations = self
            .simulations
            .ok_or(ConfigError::MissingParameter("simulations"))?;
        let steps = self.steps.ok_or(ConfigError::MissingParameter("steps"))?;

        let config = MonteCarloConfig {
            simulations,
            steps,
            seed: self.seed,
        };

        config.validate()?;
        Ok(config)
    }
}
