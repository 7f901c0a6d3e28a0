//! Monte Carlo pricing engine.
//!
//! [`MonteCarloEngine`] simulates GBM paths one at a time into a reusable
//! row buffer, evaluates the payoff on each and discounts the sample mean:
//!
//! ```text
//! price = e^{-rT} · mean(payoff_k)
//! std_error = e^{-rT} · stdev(payoff_k) / sqrt(n)
//! ```

use pricer_core::market_data::MarketObservation;
use pricer_core::types::PricingError;
use pricer_models::engine::{PricingEngine, Valuation};
use pricer_models::instruments::ContractSpec;
use tracing::debug;

use super::config::MonteCarloConfig;
use super::error::ConfigError;
use super::paths::{GbmDynamics, PathEnsemble};
use super::payoff::{ensemble_payoffs, path_payoff, SampleStats};
use crate::rng::{NormalGenerator, PricerRng};

/// Monte Carlo engine over an injected normal generator.
///
/// The generator advances across calls, so two calls on the same engine
/// use different draws; build a fresh engine with the same seed to replay a
/// run.
///
/// # Examples
///
/// ```rust
/// use pricer_core::market_data::MarketObservation;
/// use pricer_models::engine::PricingEngine;
/// use pricer_models::instruments::{ContractSpec, PayoffKind};
/// use pricer_pricing::mc::{MonteCarloConfig, MonteCarloEngine};
///
/// let config = MonteCarloConfig::builder()
///     .simulations(20_000)
///     .steps(1)
///     .seed(42)
///     .build()
///     .unwrap();
/// let market = MarketObservation::new(100.0, 0.2, 0.0, 0.05).unwrap();
/// let call = ContractSpec::new(PayoffKind::Call, 100.0, 1.0).unwrap();
///
/// let mut engine = MonteCarloEngine::new(config).unwrap();
/// let valuation = engine.price(&call, &market).unwrap();
/// assert!((valuation.price - 10.45).abs() < 4.0 * valuation.std_error.unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct MonteCarloEngine<G = PricerRng> {
    config: MonteCarloConfig,
    rng: G,
}

impl MonteCarloEngine<PricerRng> {
    /// Engine over [`PricerRng`], seeded from the configuration or from
    /// entropy when no seed is set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration is invalid.
    pub fn new(config: MonteCarloConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed() {
            Some(seed) => PricerRng::from_seed(seed),
            None => PricerRng::from_entropy(),
        };
        debug!(seed = rng.seed(), "monte carlo generator seeded");
        Self::with_generator(config, rng)
    }
}

impl<G: NormalGenerator> MonteCarloEngine<G> {
    /// Engine drawing from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration is invalid.
    pub fn with_generator(config: MonteCarloConfig, rng: G) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    /// Simulation settings.
    #[inline]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// The generator, e.g. to read back its seed.
    #[inline]
    pub fn generator(&self) -> &G {
        &self.rng
    }

    /// Simulate and keep the full path matrix, for inspection.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` for a non-positive expiry.
    pub fn simulate_paths(
        &mut self,
        market: &MarketObservation,
        expiry: f64,
    ) -> Result<PathEnsemble, PricingError> {
        PathEnsemble::simulate(
            market,
            expiry,
            self.config.steps(),
            self.config.simulations(),
            &mut self.rng,
        )
    }

    fn long_valuation(
        &mut self,
        contract: &ContractSpec,
        market: &MarketObservation,
    ) -> Result<Valuation, PricingError> {
        if contract.exercise().is_american() {
            return Err(PricingError::InvalidInput(
                "Monte Carlo prices European exercise only".to_string(),
            ));
        }
        let dynamics = GbmDynamics::new(market, contract.expiry(), self.config.steps())?;
        debug!(
            payoff = contract.payoff().name(),
            simulations = self.config.simulations(),
            steps = self.config.steps(),
            "monte carlo run"
        );

        let mut row = vec![0.0; self.config.steps() + 1];
        let mut stats = SampleStats::default();
        for _ in 0..self.config.simulations() {
            dynamics.fill_path(&mut row, &mut self.rng);
            stats.push(path_payoff(contract, &row));
        }
        Ok(discounted(stats, market.rate(), contract.expiry()))
    }
}

impl<G: NormalGenerator> PricingEngine for MonteCarloEngine<G> {
    fn name(&self) -> &'static str {
        "monte-carlo"
    }

    fn price(
        &mut self,
        contract: &ContractSpec,
        market: &MarketObservation,
    ) -> Result<Valuation, PricingError> {
        let valuation = self.long_valuation(contract, market)?;
        debug!(price = valuation.price, std_error = ?valuation.std_error, "monte carlo done");
        Ok(valuation.signed(contract.position()))
    }
}

/// Price `contract` on an already simulated ensemble.
///
/// Gives the same number as [`MonteCarloEngine`] when the ensemble was
/// drawn from an identically seeded generator with the same settings.
pub fn price_ensemble(contract: &ContractSpec, ensemble: &PathEnsemble, rate: f64) -> Valuation {
    let stats = ensemble_payoffs(contract, ensemble);
    discounted(stats, rate, contract.expiry()).signed(contract.position())
}

fn discounted(stats: SampleStats, rate: f64, expiry: f64) -> Valuation {
    let df = (-rate * expiry).exp();
    let valuation = Valuation::from_price(df * stats.mean());
    match stats.std_error() {
        Some(se) => valuation.with_std_error(df * se),
        None => valuation,
    }
}
