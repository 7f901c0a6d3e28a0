//! Contract specification.

use super::{ExerciseStyle, InstrumentError, PayoffKind, Position};

/// Immutable description of a single-asset contract.
///
/// Built once per pricing request and read by every engine. The position
/// only flips the sign of the resulting valuation.
///
/// # Examples
/// ```
/// use pricer_models::instruments::{ContractSpec, ExerciseStyle, PayoffKind, Position};
///
/// let put = ContractSpec::new(PayoffKind::Put, 100.0, 1.0)
///     .unwrap()
///     .with_exercise(ExerciseStyle::American)
///     .with_position(Position::Short);
///
/// assert!(put.exercise().is_american());
/// assert_eq!(put.position().sign(), -1.0);
///
/// assert!(ContractSpec::new(PayoffKind::Call, 100.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContractSpec {
    payoff: PayoffKind,
    strike: f64,
    expiry: f64,
    exercise: ExerciseStyle,
    amount: f64,
    position: Position,
}

impl ContractSpec {
    /// European, long, unit-amount contract.
    ///
    /// # Errors
    /// - `InstrumentError::InvalidStrike` if strike is not positive and finite
    /// - `InstrumentError::InvalidExpiry` if expiry is not positive and finite
    /// - `InstrumentError::InvalidRange` for a range accrual without
    ///   `0 < lower < upper`
    pub fn new(payoff: PayoffKind, strike: f64, expiry: f64) -> Result<Self, InstrumentError> {
        if !(strike > 0.0 && strike.is_finite()) {
            return Err(InstrumentError::InvalidStrike { strike });
        }
        if !(expiry > 0.0 && expiry.is_finite()) {
            return Err(InstrumentError::InvalidExpiry { expiry });
        }
        if let PayoffKind::RangeAccrual { lower, upper } = payoff {
            if !(lower > 0.0 && upper > lower && upper.is_finite()) {
                return Err(InstrumentError::InvalidRange { lower, upper });
            }
        }
        Ok(Self {
            payoff,
            strike,
            expiry,
            exercise: ExerciseStyle::European,
            amount: 1.0,
            position: Position::Long,
        })
    }

    /// Range accrual paying `coupon` if `lower < S_T < upper`.
    ///
    /// The strike slot holds the lower barrier.
    pub fn range_accrual(
        lower: f64,
        upper: f64,
        expiry: f64,
        coupon: f64,
    ) -> Result<Self, InstrumentError> {
        Self::new(PayoffKind::RangeAccrual { lower, upper }, lower, expiry)?.with_amount(coupon)
    }

    /// Set the exercise style.
    pub fn with_exercise(mut self, exercise: ExerciseStyle) -> Self {
        self.exercise = exercise;
        self
    }

    /// Set the position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Set the digital payout or range coupon.
    ///
    /// # Errors
    /// `InstrumentError::InvalidAmount` for a negative or non-finite amount.
    pub fn with_amount(mut self, amount: f64) -> Result<Self, InstrumentError> {
        if !(amount >= 0.0 && amount.is_finite()) {
            return Err(InstrumentError::InvalidAmount { amount });
        }
        self.amount = amount;
        Ok(self)
    }

    /// Payoff kind.
    #[inline]
    pub fn payoff(&self) -> PayoffKind {
        self.payoff
    }

    /// Strike K.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Time to expiry T in years.
    #[inline]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Exercise style.
    #[inline]
    pub fn exercise(&self) -> ExerciseStyle {
        self.exercise
    }

    /// Digital payout or range coupon.
    #[inline]
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Long or short.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Payoff for a terminal price (or path average for Asian payoffs).
    #[inline]
    pub fn payoff_at(&self, underlying: f64) -> f64 {
        self.payoff.evaluate(underlying, self.strike, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = ContractSpec::new(PayoffKind::Call, 100.0, 0.5).unwrap();
        assert_eq!(c.exercise(), ExerciseStyle::European);
        assert_eq!(c.position(), Position::Long);
        assert_eq!(c.amount(), 1.0);
        assert_eq!(c.payoff_at(120.0), 20.0);
    }

    #[test]
    fn test_rejects_bad_strike_and_expiry() {
        assert!(matches!(
            ContractSpec::new(PayoffKind::Call, -1.0, 1.0),
            Err(InstrumentError::InvalidStrike { .. })
        ));
        assert!(matches!(
            ContractSpec::new(PayoffKind::Put, 100.0, -1.0),
            Err(InstrumentError::InvalidExpiry { .. })
        ));
        assert!(ContractSpec::new(PayoffKind::Put, 100.0, f64::NAN).is_err());
    }

    #[test]
    fn test_range_accrual_constructor() {
        let c = ContractSpec::range_accrual(90.0, 110.0, 1.0, 5.0).unwrap();
        assert_eq!(c.strike(), 90.0);
        assert_eq!(c.amount(), 5.0);
        assert_eq!(c.payoff_at(100.0), 5.0);
        assert!(ContractSpec::range_accrual(110.0, 90.0, 1.0, 5.0).is_err());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let c = ContractSpec::new(PayoffKind::DigitalCall, 100.0, 1.0).unwrap();
        assert!(matches!(
            c.with_amount(-1.0),
            Err(InstrumentError::InvalidAmount { .. })
        ));
    }
}
