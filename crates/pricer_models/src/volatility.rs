//! Volatility selection for the lattice and closed-form pricers.
//!
//! A contract is priced either with the flat historical volatility of its
//! underlying or, when the market quotes a smile at the contract's expiry,
//! with the SVI volatility at the contract's own strike.

use pricer_core::market_data::{MarketDataProvider, MarketObservation};
use pricer_core::traits::calibration::{CalibrationConfig, Calibrator};
use pricer_core::types::PricingError;
use tracing::{debug, warn};

use crate::calibration::{SviCalibrator, SviParams};

/// Where a pricing volatility comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VolatilitySource {
    /// Flat (historical) volatility
    Flat(f64),
    /// SVI smile fitted around the spot
    Smile(SviParams),
}

impl VolatilitySource {
    /// Volatility for a strike.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::calibration::SviParams;
    /// use pricer_models::volatility::VolatilitySource;
    ///
    /// assert_eq!(VolatilitySource::Flat(0.25).resolve(100.0, 120.0), 0.25);
    ///
    /// let smile = VolatilitySource::Smile(SviParams::new(0.04, 0.0, 0.0, 0.0, 0.0).unwrap());
    /// assert!((smile.resolve(100.0, 120.0) - 0.2).abs() < 1e-15);
    /// ```
    pub fn resolve(&self, spot: f64, strike: f64) -> f64 {
        match self {
            VolatilitySource::Flat(vol) => *vol,
            VolatilitySource::Smile(params) => params.vol_at_strike(spot, strike),
        }
    }

    /// True when a fitted smile is used.
    pub fn is_smile(&self) -> bool {
        matches!(self, VolatilitySource::Smile(_))
    }

    /// Copy of `market` carrying the volatility for `strike`.
    pub fn apply(
        &self,
        market: &MarketObservation,
        strike: f64,
    ) -> Result<MarketObservation, PricingError> {
        market.with_volatility(self.resolve(market.spot(), strike))
    }
}

/// Choose the volatility source for `ticker` at `expiry`.
///
/// A missing smile (`NoMarketData`) falls back to the flat volatility of the
/// ticker's observation; every other failure, including a diverged fit,
/// propagates.
pub fn select_volatility<P>(
    provider: &P,
    ticker: &str,
    expiry: f64,
    config: &CalibrationConfig,
) -> Result<VolatilitySource, PricingError>
where
    P: MarketDataProvider + ?Sized,
{
    let observation = provider.observation(ticker)?;
    match provider.smile(ticker, expiry) {
        Ok(smile) => {
            let fit = SviCalibrator::new(observation.spot(), &smile)?.calibrate(config)?;
            debug!(ticker, expiry, params = %fit.params, rmse = fit.rmse(), "using SVI smile");
            Ok(VolatilitySource::Smile(fit.params))
        }
        Err(PricingError::NoMarketData(reason)) => {
            warn!(ticker, expiry, %reason, "no smile quoted, using flat volatility");
            Ok(VolatilitySource::Flat(observation.volatility()))
        }
        Err(err) => Err(err),
    }
}
