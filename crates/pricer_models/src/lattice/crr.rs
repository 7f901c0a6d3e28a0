//! Cox-Ross-Rubinstein equity lattice.
//!
//! dt = T/n, u = e^(σ√dt), d = 1/u, p = (e^((r-q)dt) - d) / (u - d).
//! Node `(step, downs)` carries S₀·u^(step-downs)·d^downs.

use pricer_core::market_data::MarketObservation;
use pricer_core::types::PricingError;
use tracing::debug;

use super::{walk_back, TriangularLattice};
use crate::instruments::{ContractSpec, OptionType};

/// Per-step tree parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrrParameters {
    /// Step length in years.
    pub dt: f64,
    /// Up factor u.
    pub up: f64,
    /// Down factor d = 1/u.
    pub down: f64,
    /// Risk-neutral up probability.
    pub probability: f64,
    /// One-step discount factor e^(-r·dt).
    pub discount: f64,
}

impl CrrParameters {
    /// Parameters for an `steps`-step tree to `expiry`.
    ///
    /// # Errors
    /// - `PricingError::InvalidInput` for zero steps or a non-positive expiry
    /// - `PricingError::NumericalDegeneracy` when p falls outside [0, 1]
    ///   (drift too large for the step size)
    pub fn new(
        market: &MarketObservation,
        expiry: f64,
        steps: usize,
    ) -> Result<Self, PricingError> {
        if steps == 0 {
            return Err(PricingError::InvalidInput(
                "binomial steps must be at least 1".to_string(),
            ));
        }
        if !(expiry > 0.0 && expiry.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "expiry must be positive, got {}",
                expiry
            )));
        }
        let dt = expiry / steps as f64;
        let up = (market.volatility() * dt.sqrt()).exp();
        let down = 1.0 / up;
        let growth = ((market.rate() - market.dividend_yield()) * dt).exp();
        let probability = (growth - down) / (up - down);
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(PricingError::NumericalDegeneracy(format!(
                "risk-neutral probability {} outside [0, 1]",
                probability
            )));
        }
        Ok(Self {
            dt,
            up,
            down,
            probability,
            discount: (-market.rate() * dt).exp(),
        })
    }
}

/// Asset and option value trees for one valuation.
#[derive(Debug, Clone)]
pub struct EquityLattice {
    params: CrrParameters,
    prices: TriangularLattice<f64>,
    values: TriangularLattice<f64>,
}

impl EquityLattice {
    /// Build and value the tree for a vanilla call or put.
    ///
    /// American contracts compare continuation with intrinsic value at every
    /// node during the backward pass.
    ///
    /// # Errors
    /// - `PricingError::InvalidInput` for zero steps or a non-vanilla payoff
    /// - `PricingError::NumericalDegeneracy` from [`CrrParameters::new`]
    ///
    /// # Examples
    /// ```
    /// use pricer_core::market_data::MarketObservation;
    /// use pricer_models::instruments::{ContractSpec, ExerciseStyle, PayoffKind};
    /// use pricer_models::lattice::EquityLattice;
    ///
    /// let market = MarketObservation::new(100.0, 0.2, 0.0, 0.05).unwrap();
    /// let put = ContractSpec::new(PayoffKind::Put, 100.0, 1.0).unwrap();
    ///
    /// let european = EquityLattice::build(&put, &market, 200).unwrap();
    /// let american_put = put.with_exercise(ExerciseStyle::American);
    /// let american = EquityLattice::build(&american_put, &market, 200).unwrap();
    /// assert!(american.price() > european.price());
    /// ```
    pub fn build(
        contract: &ContractSpec,
        market: &MarketObservation,
        steps: usize,
    ) -> Result<Self, PricingError> {
        let option_type = match contract.payoff().option_type() {
            Some(option_type) if contract.payoff().is_vanilla() => option_type,
            _ => {
                return Err(PricingError::InvalidInput(format!(
                    "binomial lattice does not price {} payoffs",
                    contract.payoff()
                )))
            }
        };
        let params = CrrParameters::new(market, contract.expiry(), steps)?;
        let spot = market.spot();
        let strike = contract.strike();

        let prices = TriangularLattice::from_fn(steps, |step, downs| {
            spot * params.up.powi((step - downs) as i32) * params.down.powi(downs as i32)
        });

        let node_intrinsic =
            |step: usize, downs: usize| option_type.intrinsic(prices.layer(step)[downs], strike);
        let exercise: Option<&dyn Fn(usize, usize) -> f64> = if contract.exercise().is_american() {
            Some(&node_intrinsic)
        } else {
            None
        };

        let (p, disc) = (params.probability, params.discount);
        let values = walk_back(
            steps,
            |downs| node_intrinsic(steps, downs),
            |_, _, up, down| disc * (p * up + (1.0 - p) * down),
            exercise,
        );

        debug!(
            steps,
            nodes = values.len(),
            american = contract.exercise().is_american(),
            price = values.root(),
            "CRR lattice valued"
        );

        Ok(Self {
            params,
            prices,
            values,
        })
    }

    /// Root option value (long, unit position).
    #[inline]
    pub fn price(&self) -> f64 {
        self.values.root()
    }

    /// Tree parameters.
    pub fn params(&self) -> &CrrParameters {
        &self.params
    }

    /// Asset prices by `(step, downs)`.
    pub fn prices(&self) -> &TriangularLattice<f64> {
        &self.prices
    }

    /// Option values by `(step, downs)`.
    pub fn values(&self) -> &TriangularLattice<f64> {
        &self.values
    }
}

/// Binomial price of a vanilla contract (long, unit position).
pub fn binomial_price(
    contract: &ContractSpec,
    market: &MarketObservation,
    steps: usize,
) -> Result<f64, PricingError> {
    EquityLattice::build(contract, market, steps).map(|lattice| lattice.price())
}

/// Intrinsic value at every node of an asset price lattice.
pub fn intrinsic_lattice(
    prices: &TriangularLattice<f64>,
    option_type: OptionType,
    strike: f64,
) -> TriangularLattice<f64> {
    TriangularLattice::from_fn(prices.steps(), |step, downs| {
        option_type.intrinsic(prices.layer(step)[downs], strike)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytical::BlackScholes;
    use crate::instruments::{ExerciseStyle, PayoffKind};
    use approx::assert_relative_eq;

    fn market() -> MarketObservation {
        MarketObservation::new(100.0, 0.2, 0.0, 0.05).unwrap()
    }

    #[test]
    fn test_parameters() {
        let params = CrrParameters::new(&market(), 1.0, 4).unwrap();
        assert_relative_eq!(params.dt, 0.25);
        assert_relative_eq!(params.up * params.down, 1.0, epsilon = 1e-15);
        assert_relative_eq!(params.up, (0.2_f64 * 0.5).exp(), epsilon = 1e-15);
        assert!(params.probability > 0.5 && params.probability < 1.0);
    }

    #[test]
    fn test_terminal_layer() {
        let call = ContractSpec::new(PayoffKind::Call, 100.0, 1.0).unwrap();
        let lattice = EquityLattice::build(&call, &market(), 3).unwrap();
        let u = lattice.params().up;
        let leaves = lattice.prices().layer(3);
        for (i, &s) in leaves.iter().enumerate() {
            let expected = 100.0 * u.powi(3 - i as i32) * (1.0 / u).powi(i as i32);
            assert_relative_eq!(s, expected, epsilon = 1e-10);
        }
        assert_relative_eq!(lattice.prices().root(), 100.0);
    }

    #[test]
    fn test_one_step_by_hand() {
        let call = ContractSpec::new(PayoffKind::Call, 100.0, 1.0).unwrap();
        let lattice = EquityLattice::build(&call, &market(), 1).unwrap();
        let CrrParameters {
            up,
            probability,
            discount,
            ..
        } = *lattice.params();
        let expected = discount * probability * (100.0 * up - 100.0);
        assert_relative_eq!(lattice.price(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_converges_to_closed_form() {
        let call = ContractSpec::new(PayoffKind::Call, 100.0, 1.0).unwrap();
        let reference = BlackScholes::new(100.0, 0.05, 0.2, 0.0)
            .unwrap()
            .price_call(100.0, 1.0);
        let coarse = (binomial_price(&call, &market(), 50).unwrap() - reference).abs();
        let fine = (binomial_price(&call, &market(), 2000).unwrap() - reference).abs();
        assert!(fine < 1e-2);
        assert!(fine < coarse);
    }

    #[test]
    fn test_american_dominates_intrinsic_at_every_node() {
        let put = ContractSpec::new(PayoffKind::Put, 110.0, 1.0)
            .unwrap()
            .with_exercise(ExerciseStyle::American);
        let lattice = EquityLattice::build(&put, &market(), 50).unwrap();
        let intrinsic = intrinsic_lattice(lattice.prices(), OptionType::Put, 110.0);
        for (values, floor) in lattice.values().layers().zip(intrinsic.layers()) {
            for (v, f) in values.iter().zip(floor) {
                assert!(v >= f);
            }
        }
    }

    #[test]
    fn test_american_call_without_carry_equals_european() {
        let call = ContractSpec::new(PayoffKind::Call, 100.0, 1.0).unwrap();
        let european = binomial_price(&call, &market(), 100).unwrap();
        let american =
            binomial_price(&call.with_exercise(ExerciseStyle::American), &market(), 100).unwrap();
        assert_relative_eq!(american, european, epsilon = 1e-10);
    }

    #[test]
    fn test_rejects_unsupported_payoffs() {
        let digital = ContractSpec::new(PayoffKind::DigitalCall, 100.0, 1.0).unwrap();
        assert!(binomial_price(&digital, &market(), 10)
            .unwrap_err()
            .is_invalid_input());
        let asian = ContractSpec::new(PayoffKind::AsianPut, 100.0, 1.0).unwrap();
        assert!(binomial_price(&asian, &market(), 10).is_err());
        let range = ContractSpec::range_accrual(90.0, 110.0, 1.0, 1.0).unwrap();
        assert!(binomial_price(&range, &market(), 10).is_err());
    }

    #[test]
    fn test_zero_steps_rejected() {
        let call = ContractSpec::new(PayoffKind::Call, 100.0, 1.0).unwrap();
        assert!(binomial_price(&call, &market(), 0)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_extreme_drift_is_degenerate() {
        let wild = MarketObservation::new(100.0, 0.01, 0.0, 5.0).unwrap();
        let call = ContractSpec::new(PayoffKind::Call, 100.0, 1.0).unwrap();
        assert!(binomial_price(&call, &wild, 1)
            .unwrap_err()
            .is_numerical_degeneracy());
    }
}
