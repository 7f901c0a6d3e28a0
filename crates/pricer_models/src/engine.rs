//! Uniform pricing interface over the closed-form, lattice and simulation
//! engines.

use std::fmt;

use pricer_core::market_data::MarketObservation;
use pricer_core::types::PricingError;

use crate::analytical::{BlackScholes, Greeks};
use crate::instruments::{ContractSpec, OptionType, PayoffKind, Position};
use crate::lattice::binomial_price;

/// Result of one valuation, already signed for the contract's position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Valuation {
    /// Present value.
    pub price: f64,
    /// Analytic sensitivities, when the engine produces them.
    pub greeks: Option<Greeks<f64>>,
    /// Standard error of a simulated price.
    pub std_error: Option<f64>,
}

impl Valuation {
    /// Price-only valuation.
    pub fn from_price(price: f64) -> Self {
        Self {
            price,
            greeks: None,
            std_error: None,
        }
    }

    /// Attach Greeks.
    pub fn with_greeks(mut self, greeks: Greeks<f64>) -> Self {
        self.greeks = Some(greeks);
        self
    }

    /// Attach a standard error.
    pub fn with_std_error(mut self, std_error: f64) -> Self {
        self.std_error = Some(std_error);
        self
    }

    /// Flip price and Greeks for a short position; the standard error is a
    /// magnitude and stays as is.
    pub fn signed(self, position: Position) -> Self {
        Self {
            price: self.price * position.sign(),
            greeks: self.greeks.map(|g| g.signed(position)),
            std_error: self.std_error,
        }
    }
}

impl fmt::Display for Valuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.price)?;
        if let Some(se) = self.std_error {
            write!(f, " (± {:.6})", se)?;
        }
        Ok(())
    }
}

/// A method that values contracts against a market snapshot.
///
/// Engines take `&mut self` so simulation engines can advance their random
/// stream; deterministic engines ignore the mutability.
pub trait PricingEngine {
    /// Engine name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Value `contract` under `market`.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` for a payoff or exercise style the engine
    /// does not support, plus any engine-specific failure.
    fn price(
        &mut self,
        contract: &ContractSpec,
        market: &MarketObservation,
    ) -> Result<Valuation, PricingError>;
}

/// Black-Scholes-Merton closed form.
///
/// Vanilla calls and puts come with Greeks; digitals and range accruals are
/// price only. American and Asian contracts are rejected.
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketObservation;
/// use pricer_models::engine::{ClosedFormEngine, PricingEngine};
/// use pricer_models::instruments::{ContractSpec, PayoffKind, Position};
///
/// let market = MarketObservation::new(100.0, 0.2, 0.0, 0.05).unwrap();
/// let long = ContractSpec::new(PayoffKind::Call, 100.0, 1.0).unwrap();
/// let short = long.with_position(Position::Short);
///
/// let mut engine = ClosedFormEngine;
/// let l = engine.price(&long, &market).unwrap();
/// let s = engine.price(&short, &market).unwrap();
/// assert_eq!(l.price, -s.price);
/// assert_eq!(l.greeks.unwrap().delta, -s.greeks.unwrap().delta);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedFormEngine;

impl PricingEngine for ClosedFormEngine {
    fn name(&self) -> &'static str {
        "closed-form"
    }

    fn price(
        &mut self,
        contract: &ContractSpec,
        market: &MarketObservation,
    ) -> Result<Valuation, PricingError> {
        if contract.exercise().is_american() {
            return Err(PricingError::InvalidInput(
                "closed form prices European exercise only".to_string(),
            ));
        }
        let model = BlackScholes::from_market(market)?;
        let (strike, expiry, amount) = (contract.strike(), contract.expiry(), contract.amount());

        let vanilla = |option_type| {
            Valuation::from_price(model.price(strike, expiry, option_type))
                .with_greeks(model.greeks(strike, expiry, option_type))
        };

        let valuation = match contract.payoff() {
            PayoffKind::Call => vanilla(OptionType::Call),
            PayoffKind::Put => vanilla(OptionType::Put),
            PayoffKind::DigitalCall => {
                Valuation::from_price(model.digital_call(strike, expiry, amount))
            }
            PayoffKind::DigitalPut => {
                Valuation::from_price(model.digital_put(strike, expiry, amount))
            }
            PayoffKind::RangeAccrual { lower, upper } => {
                Valuation::from_price(model.range_accrual(lower, upper, expiry, amount))
            }
            PayoffKind::AsianCall | PayoffKind::AsianPut => {
                return Err(PricingError::InvalidInput(format!(
                    "closed form does not price {} payoffs",
                    contract.payoff()
                )))
            }
        };
        Ok(valuation.signed(contract.position()))
    }
}

/// Cox-Ross-Rubinstein lattice for vanilla European and American options.
#[derive(Debug, Clone, Copy)]
pub struct BinomialEngine {
    steps: usize,
}

impl BinomialEngine {
    /// Default number of time steps.
    pub const DEFAULT_STEPS: usize = 100;

    /// Engine with `steps` time steps.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` for zero steps.
    pub fn new(steps: usize) -> Result<Self, PricingError> {
        if steps == 0 {
            return Err(PricingError::InvalidInput(
                "binomial steps must be at least 1".to_string(),
            ));
        }
        Ok(Self { steps })
    }

    /// Number of time steps.
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl Default for BinomialEngine {
    fn default() -> Self {
        Self {
            steps: Self::DEFAULT_STEPS,
        }
    }
}

impl PricingEngine for BinomialEngine {
    fn name(&self) -> &'static str {
        "binomial"
    }

    fn price(
        &mut self,
        contract: &ContractSpec,
        market: &MarketObservation,
    ) -> Result<Valuation, PricingError> {
        let price = binomial_price(contract, market, self.steps)?;
        Ok(Valuation::from_price(price).signed(contract.position()))
    }
}
