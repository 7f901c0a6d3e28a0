//! Payoff definitions.
//!
//! [`PayoffKind`] is the tagged variant every engine consumes; engines match
//! on it once and reject combinations they cannot value.

use std::fmt;
use std::str::FromStr;

/// Direction of a vanilla option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Right to buy.
    Call,
    /// Right to sell.
    Put,
}

impl OptionType {
    /// Intrinsic value max(S - K, 0) or max(K - S, 0).
    #[inline]
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            _ => Err(format!("Unknown option type: {}", s)),
        }
    }
}

/// Payoff of a single-asset contract.
///
/// # Variants
/// - `Call` / `Put`: max(S - K, 0) / max(K - S, 0)
/// - `DigitalCall` / `DigitalPut`: pays the amount if S > K / S < K
/// - `RangeAccrual`: pays the coupon if `lower < S_T < upper`
/// - `AsianCall` / `AsianPut`: vanilla payoff on the arithmetic path average
///
/// # Examples
/// ```
/// use pricer_models::instruments::PayoffKind;
///
/// assert_eq!(PayoffKind::Call.evaluate(110.0, 100.0, 1.0), 10.0);
/// assert_eq!(PayoffKind::DigitalPut.evaluate(90.0, 100.0, 5.0), 5.0);
///
/// let range = PayoffKind::RangeAccrual { lower: 90.0, upper: 110.0 };
/// assert_eq!(range.evaluate(100.0, 0.0, 2.0), 2.0);
/// assert_eq!(range.evaluate(110.0, 0.0, 2.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PayoffKind {
    /// European-style call.
    Call,
    /// European-style put.
    Put,
    /// Cash-or-nothing call.
    DigitalCall,
    /// Cash-or-nothing put.
    DigitalPut,
    /// Single-period range accrual.
    RangeAccrual {
        /// Lower barrier K_low
        lower: f64,
        /// Upper barrier K_up
        upper: f64,
    },
    /// Arithmetic-average call.
    AsianCall,
    /// Arithmetic-average put.
    AsianPut,
}

impl PayoffKind {
    /// Evaluate the payoff.
    ///
    /// # Arguments
    /// * `underlying` - Terminal price, or the path average for Asian payoffs
    /// * `strike` - Strike K (ignored by range accruals)
    /// * `amount` - Cash amount for digitals, coupon for range accruals
    ///   (ignored by vanilla and Asian payoffs)
    #[inline]
    pub fn evaluate(&self, underlying: f64, strike: f64, amount: f64) -> f64 {
        match *self {
            PayoffKind::Call | PayoffKind::AsianCall => (underlying - strike).max(0.0),
            PayoffKind::Put | PayoffKind::AsianPut => (strike - underlying).max(0.0),
            PayoffKind::DigitalCall => {
                if underlying > strike {
                    amount
                } else {
                    0.0
                }
            }
            PayoffKind::DigitalPut => {
                if underlying < strike {
                    amount
                } else {
                    0.0
                }
            }
            PayoffKind::RangeAccrual { lower, upper } => {
                if underlying > lower && underlying < upper {
                    amount
                } else {
                    0.0
                }
            }
        }
    }

    /// Call/put direction; `None` for range accruals.
    pub fn option_type(&self) -> Option<OptionType> {
        match self {
            PayoffKind::Call | PayoffKind::DigitalCall | PayoffKind::AsianCall => {
                Some(OptionType::Call)
            }
            PayoffKind::Put | PayoffKind::DigitalPut | PayoffKind::AsianPut => {
                Some(OptionType::Put)
            }
            PayoffKind::RangeAccrual { .. } => None,
        }
    }

    /// Plain call or put.
    #[inline]
    pub fn is_vanilla(&self) -> bool {
        matches!(self, PayoffKind::Call | PayoffKind::Put)
    }

    /// Digital call or put.
    #[inline]
    pub fn is_digital(&self) -> bool {
        matches!(self, PayoffKind::DigitalCall | PayoffKind::DigitalPut)
    }

    /// Depends on the whole path rather than the terminal price.
    #[inline]
    pub fn is_path_dependent(&self) -> bool {
        matches!(self, PayoffKind::AsianCall | PayoffKind::AsianPut)
    }

    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            PayoffKind::Call => "call",
            PayoffKind::Put => "put",
            PayoffKind::DigitalCall => "digital-call",
            PayoffKind::DigitalPut => "digital-put",
            PayoffKind::RangeAccrual { .. } => "range-accrual",
            PayoffKind::AsianCall => "asian-call",
            PayoffKind::AsianPut => "asian-put",
        }
    }
}

impl fmt::Display for PayoffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoffKind::RangeAccrual { lower, upper } => {
                write!(f, "range-accrual[{}, {}]", lower, upper)
            }
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vanilla_payoffs() {
        assert_eq!(PayoffKind::Call.evaluate(90.0, 100.0, 1.0), 0.0);
        assert_eq!(PayoffKind::Put.evaluate(90.0, 100.0, 1.0), 10.0);
        assert_eq!(PayoffKind::AsianCall.evaluate(104.0, 100.0, 1.0), 4.0);
    }

    #[test]
    fn test_digital_at_strike_pays_nothing() {
        assert_eq!(PayoffKind::DigitalCall.evaluate(100.0, 100.0, 1.0), 0.0);
        assert_eq!(PayoffKind::DigitalPut.evaluate(100.0, 100.0, 1.0), 0.0);
    }

    #[test]
    fn test_range_bounds_are_strict() {
        let range = PayoffKind::RangeAccrual {
            lower: 90.0,
            upper: 110.0,
        };
        assert_eq!(range.evaluate(90.0, 0.0, 1.0), 0.0);
        assert_eq!(range.evaluate(90.0001, 0.0, 1.0), 1.0);
        assert!(range.option_type().is_none());
    }

    #[test]
    fn test_classification() {
        assert!(PayoffKind::Call.is_vanilla());
        assert!(PayoffKind::DigitalPut.is_digital());
        assert!(PayoffKind::AsianPut.is_path_dependent());
        assert_eq!(PayoffKind::AsianPut.option_type(), Some(OptionType::Put));
    }

    #[test]
    fn test_option_type_parse_and_intrinsic() {
        assert_eq!("Call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert!("straddle".parse::<OptionType>().is_err());
        assert_eq!(OptionType::Put.intrinsic(95.0, 100.0), 5.0);
        assert_eq!(OptionType::Call.intrinsic(95.0, 100.0), 0.0);
    }
}
