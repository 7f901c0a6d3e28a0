//! Cross-model comparison.
//!
//! Prices one European vanilla contract with the closed form, the CRR
//! lattice and Monte Carlo. The three runs share nothing and execute in
//! parallel on the rayon pool.

use std::fmt;

use pricer_core::market_data::MarketObservation;
use pricer_core::types::PricingError;
use pricer_models::engine::{BinomialEngine, ClosedFormEngine, PricingEngine, Valuation};
use pricer_models::instruments::ContractSpec;
use tracing::debug;

use crate::mc::{MonteCarloConfig, MonteCarloEngine};

/// Lattice and simulation settings for a comparison.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonSettings {
    /// CRR time steps.
    pub binomial_steps: usize,
    /// Monte Carlo settings.
    pub monte_carlo: MonteCarloConfig,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            binomial_steps: BinomialEngine::DEFAULT_STEPS,
            monte_carlo: MonteCarloConfig::default(),
        }
    }
}

/// Prices of the same contract under the three methods.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ModelComparison {
    /// Black-Scholes-Merton closed form, with Greeks.
    pub closed_form: Valuation,
    /// CRR lattice.
    pub binomial: Valuation,
    /// Monte Carlo, with standard error.
    pub monte_carlo: Valuation,
}

impl ModelComparison {
    /// Lattice price minus closed-form price.
    pub fn binomial_deviation(&self) -> f64 {
        self.binomial.price - self.closed_form.price
    }

    /// Monte Carlo price minus closed-form price.
    pub fn monte_carlo_deviation(&self) -> f64 {
        self.monte_carlo.price - self.closed_form.price
    }

    /// Monte Carlo deviation in units of its standard error.
    pub fn monte_carlo_z_score(&self) -> Option<f64> {
        self.monte_carlo
            .std_error
            .filter(|se| *se > 0.0)
            .map(|se| self.monte_carlo_deviation() / se)
    }
}

impl fmt::Display for ModelComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<12} {:>12} {:>12}", "model", "price", "deviation")?;
        writeln!(f, "{:<12} {:>12.6} {:>12}", "closed-form", self.closed_form.price, "-")?;
        writeln!(
            f,
            "{:<12} {:>12.6} {:>12.6}",
            "binomial",
            self.binomial.price,
            self.binomial_deviation()
        )?;
        write!(
            f,
            "{:<12} {:>12.6} {:>12.6}",
            "monte-carlo",
            self.monte_carlo.price,
            self.monte_carlo_deviation()
        )
    }
}

/// Value `contract` with every method and report the deviations.
///
/// # Errors
/// `PricingError::InvalidInput` unless the contract is a European call or
/// put, plus any error raised by one of the engines.
///
/// # Examples
/// ```rust
/// use pricer_core::market_data::MarketObservation;
/// use pricer_models::instruments::{ContractSpec, PayoffKind};
/// use pricer_pricing::compare::{compare_models, ComparisonSettings};
/// use pricer_pricing::mc::MonteCarloConfig;
///
/// let market = MarketObservation::new(100.0, 0.2, 0.0, 0.05).unwrap();
/// let call = ContractSpec::new(PayoffKind::Call, 100.0, 1.0).unwrap();
/// let settings = ComparisonSettings {
///     binomial_steps: 200,
///     monte_carlo: MonteCarloConfig::builder()
///         .simulations(20_000)
///         .steps(1)
///         .seed(1)
///         .build()
///         .unwrap(),
/// };
///
/// let report = compare_models(&call, &market, &settings).unwrap();
/// assert!(report.binomial_deviation().abs() < 0.05);
/// ```
pub fn compare_models(
    contract: &ContractSpec,
    market: &MarketObservation,
    settings: &ComparisonSettings,
) -> Result<ModelComparison, PricingError> {
    if !contract.payoff().is_vanilla() || contract.exercise().is_american() {
        return Err(PricingError::InvalidInput(format!(
            "model comparison needs a European call or put, got {} {}",
            contract.exercise(),
            contract.payoff()
        )));
    }
    let mut binomial = BinomialEngine::new(settings.binomial_steps)?;
    let mut monte_carlo = MonteCarloEngine::new(settings.monte_carlo)?;

    let (closed_form, (binomial, monte_carlo)) = rayon::join(
        || ClosedFormEngine.price(contract, market),
        || {
            rayon::join(
                || binomial.price(contract, market),
                || monte_carlo.price(contract, market),
            )
        },
    );

    let comparison = ModelComparison {
        closed_form: closed_form?,
        binomial: binomial?,
        monte_carlo: monte_carlo?,
    };
    debug!(
        binomial_deviation = comparison.binomial_deviation(),
        monte_carlo_deviation = comparison.monte_carlo_deviation(),
        "model comparison done"
    );
    Ok(comparison)
}
