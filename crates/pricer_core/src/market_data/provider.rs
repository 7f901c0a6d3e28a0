//! Market-data collaborator interface.
//!
//! Pricers never fetch data themselves. A [`MarketDataProvider`] produces
//! [`MarketObservation`]s, smiles and treasury rates, and the caller hands
//! those values to the pricer explicitly.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use super::{MarketObservation, VolSmile};
use crate::types::PricingError;

/// Expiries closer than this (in years, half a day) match the same smile.
const EXPIRY_MATCH_TOLERANCE: f64 = 0.5 / 365.0;

/// Listed US treasury tenors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TreasuryTenor {
    /// 1 month
    M1,
    /// 2 months
    M2,
    /// 3 months
    M3,
    /// 4 months
    M4,
    /// 6 months
    M6,
    /// 1 year
    Y1,
    /// 2 years
    Y2,
    /// 3 years
    Y3,
    /// 5 years
    Y5,
    /// 7 years
    Y7,
    /// 10 years
    Y10,
    /// 20 years
    Y20,
    /// 30 years
    Y30,
}

impl TreasuryTenor {
    /// All tenors, shortest first.
    pub const ALL: [TreasuryTenor; 13] = [
        TreasuryTenor::M1,
        TreasuryTenor::M2,
        TreasuryTenor::M3,
        TreasuryTenor::M4,
        TreasuryTenor::M6,
        TreasuryTenor::Y1,
        TreasuryTenor::Y2,
        TreasuryTenor::Y3,
        TreasuryTenor::Y5,
        TreasuryTenor::Y7,
        TreasuryTenor::Y10,
        TreasuryTenor::Y20,
        TreasuryTenor::Y30,
    ];

    /// Tenor length in years.
    pub fn years(&self) -> f64 {
        match self {
            TreasuryTenor::M1 => 1.0 / 12.0,
            TreasuryTenor::M2 => 2.0 / 12.0,
            TreasuryTenor::M3 => 3.0 / 12.0,
            TreasuryTenor::M4 => 4.0 / 12.0,
            TreasuryTenor::M6 => 6.0 / 12.0,
            TreasuryTenor::Y1 => 1.0,
            TreasuryTenor::Y2 => 2.0,
            TreasuryTenor::Y3 => 3.0,
            TreasuryTenor::Y5 => 5.0,
            TreasuryTenor::Y7 => 7.0,
            TreasuryTenor::Y10 => 10.0,
            TreasuryTenor::Y20 => 20.0,
            TreasuryTenor::Y30 => 30.0,
        }
    }

    /// Market label, e.g. `"3M"` or `"10Y"`.
    pub fn label(&self) -> &'static str {
        match self {
            TreasuryTenor::M1 => "1M",
            TreasuryTenor::M2 => "2M",
            TreasuryTenor::M3 => "3M",
            TreasuryTenor::M4 => "4M",
            TreasuryTenor::M6 => "6M",
            TreasuryTenor::Y1 => "1Y",
            TreasuryTenor::Y2 => "2Y",
            TreasuryTenor::Y3 => "3Y",
            TreasuryTenor::Y5 => "5Y",
            TreasuryTenor::Y7 => "7Y",
            TreasuryTenor::Y10 => "10Y",
            TreasuryTenor::Y20 => "20Y",
            TreasuryTenor::Y30 => "30Y",
        }
    }

    /// Listed tenor nearest to `years`; ties go to the shorter tenor.
    ///
    /// ```
    /// use pricer_core::market_data::TreasuryTenor;
    ///
    /// assert_eq!(TreasuryTenor::closest(0.3), TreasuryTenor::M4);
    /// assert_eq!(TreasuryTenor::closest(8.0), TreasuryTenor::Y7);
    /// assert_eq!(TreasuryTenor::closest(100.0), TreasuryTenor::Y30);
    /// ```
    pub fn closest(years: f64) -> TreasuryTenor {
        let mut best = TreasuryTenor::M1;
        let mut best_distance = f64::INFINITY;
        for tenor in TreasuryTenor::ALL {
            let distance = (tenor.years() - years).abs();
            if distance < best_distance {
                best = tenor;
                best_distance = distance;
            }
        }
        best
    }
}

impl fmt::Display for TreasuryTenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TreasuryTenor {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        TreasuryTenor::ALL
            .into_iter()
            .find(|t| t.label() == upper)
            .ok_or_else(|| PricingError::InvalidInput(format!("Unknown treasury tenor: {}", s)))
    }
}

/// Source of market inputs for the pricers.
///
/// Every lookup distinguishes "unavailable" (`PricingError::NoMarketData`)
/// from a legitimate value, so callers can fall back or report N/A.
pub trait MarketDataProvider {
    /// Spot, volatility, carry yield and rate for a ticker.
    fn observation(&self, ticker: &str) -> Result<MarketObservation, PricingError>;

    /// Implied volatility quotes for a ticker at one expiry (years).
    fn smile(&self, ticker: &str, expiry: f64) -> Result<VolSmile, PricingError>;

    /// Treasury yield (decimal) at the listed tenor closest to `tenor_years`.
    fn treasury_rate(&self, tenor_years: f64) -> Result<f64, PricingError>;
}

/// In-memory provider populated up front.
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::{
///     MarketDataProvider, MarketObservation, StaticMarketData, TreasuryTenor,
/// };
///
/// let market = MarketObservation::new(100.0, 0.2, 0.0, 0.05).unwrap();
/// let provider = StaticMarketData::new()
///     .with_observation("ACME", market)
///     .with_treasury_rate(TreasuryTenor::Y1, 0.048);
///
/// assert_eq!(provider.observation("ACME").unwrap().spot(), 100.0);
/// assert_eq!(provider.treasury_rate(0.9).unwrap(), 0.048);
/// assert!(provider.observation("NONE").unwrap_err().is_no_market_data());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticMarketData {
    observations: HashMap<String, MarketObservation>,
    smiles: HashMap<String, Vec<VolSmile>>,
    treasury: BTreeMap<TreasuryTenor, f64>,
}

impl StaticMarketData {
    /// Empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observation for `ticker`, replacing any previous one.
    pub fn with_observation(mut self, ticker: impl Into<String>, obs: MarketObservation) -> Self {
        self.observations.insert(ticker.into(), obs);
        self
    }

    /// Register a smile for `ticker`; one smile is kept per expiry.
    pub fn with_smile(mut self, ticker: impl Into<String>, smile: VolSmile) -> Self {
        let smiles = self.smiles.entry(ticker.into()).or_default();
        smiles.retain(|s| (s.expiry() - smile.expiry()).abs() > EXPIRY_MATCH_TOLERANCE);
        smiles.push(smile);
        self
    }

    /// Register a treasury yield.
    pub fn with_treasury_rate(mut self, tenor: TreasuryTenor, rate: f64) -> Self {
        self.treasury.insert(tenor, rate);
        self
    }
}

impl MarketDataProvider for StaticMarketData {
    fn observation(&self, ticker: &str) -> Result<MarketObservation, PricingError> {
        self.observations
            .get(ticker)
            .copied()
            .ok_or_else(|| PricingError::NoMarketData(format!("no observation for {}", ticker)))
    }

    fn smile(&self, ticker: &str, expiry: f64) -> Result<VolSmile, PricingError> {
        self.smiles
            .get(ticker)
            .and_then(|smiles| {
                smiles
                    .iter()
                    .find(|s| (s.expiry() - expiry).abs() <= EXPIRY_MATCH_TOLERANCE)
            })
            .cloned()
            .ok_or_else(|| {
                PricingError::NoMarketData(format!(
                    "no smile for {} at expiry {:.4}",
                    ticker, expiry
                ))
            })
    }

    fn treasury_rate(&self, tenor_years: f64) -> Result<f64, PricingError> {
        let tenor = TreasuryTenor::closest(tenor_years);
        self.treasury
            .get(&tenor)
            .copied()
            .ok_or_else(|| PricingError::NoMarketData(format!("no treasury yield for {}", tenor)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::VolQuote;

    fn smile(expiry: f64) -> VolSmile {
        VolSmile::new(expiry, vec![VolQuote::new(100.0, 0.2)]).unwrap()
    }

    #[test]
    fn test_closest_tenor() {
        assert_eq!(TreasuryTenor::closest(0.0), TreasuryTenor::M1);
        assert_eq!(TreasuryTenor::closest(0.5), TreasuryTenor::M6);
        assert_eq!(TreasuryTenor::closest(1.4), TreasuryTenor::Y1);
        assert_eq!(TreasuryTenor::closest(4.2), TreasuryTenor::Y5);
        assert_eq!(TreasuryTenor::closest(16.0), TreasuryTenor::Y20);
    }

    #[test]
    fn test_tenor_parse_round_trip() {
        for tenor in TreasuryTenor::ALL {
            assert_eq!(tenor.to_string().parse::<TreasuryTenor>().unwrap(), tenor);
        }
        assert!("9Y".parse::<TreasuryTenor>().is_err());
    }

    #[test]
    fn test_smile_lookup_by_expiry() {
        let provider = StaticMarketData::new()
            .with_smile("ACME", smile(0.25))
            .with_smile("ACME", smile(1.0));

        assert_eq!(provider.smile("ACME", 1.0).unwrap().expiry(), 1.0);
        assert!(provider.smile("ACME", 0.5).unwrap_err().is_no_market_data());
        assert!(provider.smile("OTHER", 1.0).unwrap_err().is_no_market_data());
    }

    #[test]
    fn test_smile_replaced_for_same_expiry() {
        let replacement = VolSmile::new(1.0, vec![VolQuote::new(90.0, 0.3)]).unwrap();
        let provider = StaticMarketData::new()
            .with_smile("ACME", smile(1.0))
            .with_smile("ACME", replacement);
        assert_eq!(provider.smile("ACME", 1.0).unwrap().strikes(), vec![90.0]);
    }

    #[test]
    fn test_missing_treasury_rate() {
        let provider = StaticMarketData::new().with_treasury_rate(TreasuryTenor::Y10, 0.04);
        assert_eq!(provider.treasury_rate(9.0).unwrap(), 0.04);
        assert!(provider.treasury_rate(0.25).unwrap_err().is_no_market_data());
    }
}
