//! Fixed-coupon bond priced off a flat yield.

use std::fmt;
use std::str::FromStr;

use pricer_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
use pricer_core::types::PricingError;
use tracing::debug;

/// Starting yield for the yield-to-maturity search.
const YTM_INITIAL_GUESS: f64 = 0.05;

/// Coupon payment frequency.
///
/// # Examples
///
/// ```
/// use pricer_models::bonds::CouponFrequency;
///
/// let freq: CouponFrequency = "semi-annual".parse().unwrap();
/// assert_eq!(freq, CouponFrequency::SemiAnnual);
/// assert_eq!(freq.periods_per_year(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CouponFrequency {
    /// Once a year.
    Annual,
    /// Twice a year.
    #[default]
    SemiAnnual,
    /// Four times a year.
    Quarterly,
    /// Twelve times a year.
    Monthly,
}

impl CouponFrequency {
    /// Coupon payments per year.
    #[inline]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            CouponFrequency::Annual => 1,
            CouponFrequency::SemiAnnual => 2,
            CouponFrequency::Quarterly => 4,
            CouponFrequency::Monthly => 12,
        }
    }

    /// Standard name.
    pub fn name(&self) -> &'static str {
        match self {
            CouponFrequency::Annual => "annual",
            CouponFrequency::SemiAnnual => "semi-annual",
            CouponFrequency::Quarterly => "quarterly",
            CouponFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for CouponFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CouponFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "annual" | "1y" | "yearly" => Ok(CouponFrequency::Annual),
            "semiannual" | "6m" => Ok(CouponFrequency::SemiAnnual),
            "quarterly" | "3m" => Ok(CouponFrequency::Quarterly),
            "monthly" | "1m" => Ok(CouponFrequency::Monthly),
            _ => Err(format!("Unknown coupon frequency: {}", s)),
        }
    }
}

/// Bullet bond paying a fixed coupon.
///
/// Only whole coupon periods are priced: a 2.3-year semi-annual bond has
/// four cash flows, the last one carrying the face value.
///
/// # Examples
///
/// ```
/// use pricer_models::bonds::{CouponBond, CouponFrequency};
///
/// let bond = CouponBond::new(1000.0, 0.05, 10.0, CouponFrequency::SemiAnnual).unwrap();
/// assert_eq!(bond.coupon_payment(), 25.0);
///
/// // Priced at its own coupon rate the bond trades at par
/// assert!((bond.price(0.05) - 1000.0).abs() < 1e-9);
///
/// let ytm = bond.yield_to_maturity(950.0).unwrap();
/// assert!((bond.price(ytm) - 950.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CouponBond {
    face_value: f64,
    coupon_rate: f64,
    years_to_maturity: f64,
    frequency: CouponFrequency,
}

impl CouponBond {
    /// Create a bond.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` for a non-positive face value or
    /// maturity, a negative coupon, or a maturity shorter than one coupon
    /// period.
    pub fn new(
        face_value: f64,
        coupon_rate: f64,
        years_to_maturity: f64,
        frequency: CouponFrequency,
    ) -> Result<Self, PricingError> {
        if !(face_value > 0.0 && face_value.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "face value must be positive, got {}",
                face_value
            )));
        }
        if !(coupon_rate >= 0.0 && coupon_rate.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "coupon rate must be non-negative, got {}",
                coupon_rate
            )));
        }
        if !(years_to_maturity > 0.0 && years_to_maturity.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "time to maturity must be positive, got {}",
                years_to_maturity
            )));
        }
        let bond = Self {
            face_value,
            coupon_rate,
            years_to_maturity,
            frequency,
        };
        if bond.periods() == 0 {
            return Err(PricingError::InvalidInput(format!(
                "{} years holds no whole {} coupon period",
                years_to_maturity, frequency
            )));
        }
        Ok(bond)
    }

    /// Face value.
    pub fn face_value(&self) -> f64 {
        self.face_value
    }

    /// Annual coupon rate.
    pub fn coupon_rate(&self) -> f64 {
        self.coupon_rate
    }

    /// Years to maturity.
    pub fn years_to_maturity(&self) -> f64 {
        self.years_to_maturity
    }

    /// Coupon frequency.
    pub fn frequency(&self) -> CouponFrequency {
        self.frequency
    }

    /// Cash amount of each coupon.
    #[inline]
    pub fn coupon_payment(&self) -> f64 {
        self.face_value * self.coupon_rate / self.frequency.periods_per_year() as f64
    }

    /// Number of whole coupon periods.
    #[inline]
    pub fn periods(&self) -> usize {
        (self.years_to_maturity * self.frequency.periods_per_year() as f64).floor() as usize
    }

    /// Cash flows in payment order, face value added to the last.
    pub fn cash_flows(&self) -> Vec<f64> {
        let mut flows = vec![self.coupon_payment(); self.periods()];
        if let Some(last) = flows.last_mut() {
            *last += self.face_value;
        }
        flows
    }

    /// Price at an annually compounded yield, discounting per coupon period.
    pub fn price(&self, yield_to_maturity: f64) -> f64 {
        let per_period = yield_to_maturity / self.frequency.periods_per_year() as f64;
        self.cash_flows()
            .iter()
            .enumerate()
            .map(|(i, cf)| cf / (1.0 + per_period).powi(i as i32 + 1))
            .sum()
    }

    /// Yield that reproduces `price`.
    ///
    /// Newton-Raphson with a numerical derivative, started at 5%.
    ///
    /// # Errors
    /// - `PricingError::InvalidInput` for a non-positive price
    /// - `PricingError::NumericalDegeneracy` / `FitDivergence` when Newton
    ///   fails
    pub fn yield_to_maturity(&self, price: f64) -> Result<f64, PricingError> {
        if !(price > 0.0 && price.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "bond price must be positive, got {}",
                price
            )));
        }
        let solver = NewtonRaphsonSolver::new(SolverConfig::new(1e-10, 100));
        let ytm = solver.find_root_numeric(|y| self.price(y) - price, YTM_INITIAL_GUESS)?;
        debug!(price, ytm, "yield to maturity solved");
        Ok(ytm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cash_flows() {
        let bond = CouponBond::new(100.0, 0.06, 2.0, CouponFrequency::SemiAnnual).unwrap();
        assert_eq!(bond.cash_flows(), vec![3.0, 3.0, 3.0, 103.0]);
    }

    #[test]
    fn test_partial_period_dropped() {
        let bond = CouponBond::new(100.0, 0.04, 2.3, CouponFrequency::SemiAnnual).unwrap();
        assert_eq!(bond.periods(), 4);
    }

    #[test]
    fn test_price_by_hand() {
        let bond = CouponBond::new(100.0, 0.05, 3.0, CouponFrequency::Annual).unwrap();
        let expected = 5.0 / 1.06 + 5.0 / 1.06_f64.powi(2) + 105.0 / 1.06_f64.powi(3);
        assert_relative_eq!(bond.price(0.06), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_yield_round_trip() {
        let bond = CouponBond::new(1000.0, 0.045, 7.0, CouponFrequency::Quarterly).unwrap();
        let price = bond.price(0.0625);
        assert_relative_eq!(
            bond.yield_to_maturity(price).unwrap(),
            0.0625,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_rejects_degenerate_bonds() {
        assert!(CouponBond::new(100.0, 0.05, 0.0, CouponFrequency::Annual)
            .unwrap_err()
            .is_invalid_input());
        assert!(CouponBond::new(100.0, 0.05, 0.4, CouponFrequency::Annual).is_err());
        assert!(CouponBond::new(-100.0, 0.05, 2.0, CouponFrequency::Annual).is_err());
        let bond = CouponBond::new(100.0, 0.05, 2.0, CouponFrequency::Annual).unwrap();
        assert!(bond.yield_to_maturity(0.0).is_err());
    }

    #[test]
    fn test_parse_frequency() {
        assert_eq!(
            "Quarterly".parse::<CouponFrequency>(),
            Ok(CouponFrequency::Quarterly)
        );
        assert!("weekly".parse::<CouponFrequency>().is_err());
    }
}
