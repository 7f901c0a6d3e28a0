//! SABR smile, leading-order lognormal form.
//!
//! Away from the money:
//!
//! ```text
//! σ(K) = α / (F·K)^((1-β)/2) · z / x(z)
//! z    = ν/α · (F·K)^((1-β)/2) · ln(F/K)
//! x(z) = ln((√(1 - 2ρz + z²) + z - ρ) / (1 - ρ))
//! ```
//!
//! At the money z/x(z) is 0/0; the limit `α / F^(1-β)` is used directly.

use std::fmt;

use pricer_core::market_data::VolSmile;
use pricer_core::traits::calibration::{
    CalibrationConfig, CalibrationResult, Calibrator, ParameterBounds,
};
use pricer_core::types::PricingError;

/// Below this |ln(F/K)| a strike is treated as at the money.
pub const ATM_LOG_MONEYNESS: f64 = 1e-12;

/// Optimiser bound on |ρ|; x(z) is singular at ρ = 1.
const RHO_LIMIT: f64 = 0.999;

/// Residual charged for a quote the trial parameters cannot price.
const DEGENERATE_RESIDUAL: f64 = 1.0;

/// SABR parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SabrParams {
    /// Initial volatility level α ≥ 0.
    pub alpha: f64,
    /// CEV exponent β ∈ [0, 1].
    pub beta: f64,
    /// Spot/vol correlation ρ ∈ [-1, 1].
    pub rho: f64,
    /// Volatility of volatility ν ≥ 0.
    pub nu: f64,
}

impl SabrParams {
    /// Validated parameter set.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` when a parameter is non-finite or
    /// outside its bound.
    pub fn new(alpha: f64, beta: f64, rho: f64, nu: f64) -> Result<Self, PricingError> {
        let finite = [alpha, beta, rho, nu].iter().all(|p| p.is_finite());
        if !finite || alpha < 0.0 || !(0.0..=1.0).contains(&beta) || rho.abs() > 1.0 || nu < 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "SABR parameters out of bounds: alpha={} beta={} rho={} nu={}",
                alpha, beta, rho, nu
            )));
        }
        Ok(Self {
            alpha,
            beta,
            rho,
            nu,
        })
    }

    /// At-the-money volatility α / F^(1-β).
    #[inline]
    pub fn atm_vol(&self, forward: f64) -> f64 {
        self.alpha / forward.powf(1.0 - self.beta)
    }

    /// Implied volatility at `strike`.
    ///
    /// # Errors
    /// - `PricingError::InvalidInput` for a non-positive forward or strike
    /// - `PricingError::NumericalDegeneracy` when x(z) has no real value
    ///   (e.g. ρ = 1, or α = 0 off the money)
    ///
    /// # Examples
    /// ```
    /// use pricer_models::calibration::SabrParams;
    ///
    /// let sabr = SabrParams::new(0.3, 0.5, -0.2, 0.4).unwrap();
    /// // Exactly the limit at K = F
    /// assert_eq!(sabr.implied_vol(100.0, 100.0).unwrap(), 0.3 / 100.0_f64.sqrt());
    /// // Negative skew
    /// assert!(sabr.implied_vol(100.0, 90.0).unwrap() > sabr.implied_vol(100.0, 110.0).unwrap());
    /// ```
    pub fn implied_vol(&self, forward: f64, strike: f64) -> Result<f64, PricingError> {
        if !(forward > 0.0 && strike > 0.0 && forward.is_finite() && strike.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "SABR needs positive forward and strike, got F={} K={}",
                forward, strike
            )));
        }
        let log_fk = (forward / strike).ln();
        if strike == forward || log_fk.abs() < ATM_LOG_MONEYNESS {
            return Ok(self.atm_vol(forward));
        }

        let scale = (forward * strike).powf((1.0 - self.beta) / 2.0);
        let z = self.nu / self.alpha * scale * log_fk;
        let ratio = if z == 0.0 {
            // ν = 0: z/x(z) → 1
            1.0
        } else {
            let argument =
                ((1.0 - 2.0 * self.rho * z + z * z).sqrt() + z - self.rho) / (1.0 - self.rho);
            if !(argument > 0.0) || !argument.is_finite() {
                return Err(PricingError::NumericalDegeneracy(format!(
                    "SABR x(z) undefined at K={} (z={}, rho={})",
                    strike, z, self.rho
                )));
            }
            z / argument.ln()
        };

        let vol = self.alpha / scale * ratio;
        if !vol.is_finite() {
            return Err(PricingError::NumericalDegeneracy(format!(
                "SABR volatility not finite at K={}",
                strike
            )));
        }
        Ok(vol)
    }
}

impl fmt::Display for SabrParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alpha={:.6} beta={:.6} rho={:.6} nu={:.6}",
            self.alpha, self.beta, self.rho, self.nu
        )
    }
}

/// Least-squares SABR fit to one expiry.
#[derive(Debug, Clone)]
pub struct SabrCalibrator {
    forward: f64,
    strikes: Vec<f64>,
    market_vols: Vec<f64>,
    initial: SabrParams,
}

impl SabrCalibrator {
    /// Calibrator for a smile around `forward`, starting from
    /// α = 0.2, β = 0.5, ρ = -0.3, ν = 0.4 plus data-driven starts.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` for a non-positive forward.
    pub fn new(forward: f64, smile: &VolSmile) -> Result<Self, PricingError> {
        if !(forward > 0.0 && forward.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "forward must be positive, got {}",
                forward
            )));
        }
        Ok(Self {
            forward,
            strikes: smile.strikes(),
            market_vols: smile.vols(),
            initial: SabrParams {
                alpha: 0.2,
                beta: 0.5,
                rho: -0.3,
                nu: 0.4,
            },
        })
    }

    /// Replace the user-supplied starting point.
    pub fn with_initial_guess(mut self, initial: SabrParams) -> Self {
        self.initial = initial;
        self
    }

    /// Market vol at the quote nearest the forward.
    fn atm_market_vol(&self) -> Option<f64> {
        self.strikes
            .iter()
            .zip(&self.market_vols)
            .min_by(|a, b| {
                (a.0 - self.forward)
                    .abs()
                    .total_cmp(&(b.0 - self.forward).abs())
            })
            .map(|(_, &vol)| vol)
    }

    fn params(p: &[f64]) -> SabrParams {
        SabrParams {
            alpha: p[0],
            beta: p[1],
            rho: p[2],
            nu: p[3],
        }
    }
}

impl Calibrator for SabrCalibrator {
    type Params = SabrParams;

    fn model_name(&self) -> &'static str {
        "SABR"
    }

    fn bounds(&self) -> Vec<ParameterBounds> {
        vec![
            ParameterBounds::non_negative(),
            ParameterBounds::unit_interval(),
            ParameterBounds::new(-RHO_LIMIT, RHO_LIMIT),
            ParameterBounds::non_negative(),
        ]
    }

    fn initial_guesses(&self) -> Vec<Vec<f64>> {
        let SabrParams {
            alpha,
            beta,
            rho,
            nu,
        } = self.initial;
        let mut guesses = vec![vec![alpha, beta, rho, nu]];
        if let Some(atm) = self.atm_market_vol() {
            // α matching the ATM quote for β = 1/2 and β = 1
            guesses.push(vec![atm * self.forward.sqrt(), 0.5, 0.0, 0.3]);
            guesses.push(vec![atm, 1.0, -0.3, 0.5]);
        }
        guesses
    }

    fn residuals(&self, p: &[f64]) -> Vec<f64> {
        let params = Self::params(p);
        self.strikes
            .iter()
            .zip(&self.market_vols)
            .map(|(&strike, &vol)| match params.implied_vol(self.forward, strike) {
                Ok(model) => model - vol,
                Err(_) => DEGENERATE_RESIDUAL,
            })
            .collect()
    }

    fn params_from_slice(&self, p: &[f64]) -> SabrParams {
        Self::params(p)
    }
}

/// Fit SABR to a smile.
pub fn fit_sabr(
    forward: f64,
    smile: &VolSmile,
    config: &CalibrationConfig,
) -> Result<CalibrationResult<SabrParams>, PricingError> {
    SabrCalibrator::new(forward, smile)?.calibrate(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::VolQuote;

    #[test]
    fn test_atm_limit_is_exact() {
        let sabr = SabrParams::new(0.25, 0.7, 0.3, 0.6).unwrap();
        let vol = sabr.implied_vol(50.0, 50.0).unwrap();
        assert_eq!(vol, 0.25 / 50.0_f64.powf(1.0 - 0.7));
        assert!(vol.is_finite());
    }

    #[test]
    fn test_continuous_through_the_money() {
        let sabr = SabrParams::new(2.0, 0.5, -0.25, 0.5).unwrap();
        let atm = sabr.implied_vol(100.0, 100.0).unwrap();
        let near = sabr.implied_vol(100.0, 100.0 * (1.0 + 1e-7)).unwrap();
        assert_relative_eq!(atm, near, epsilon = 1e-6);
    }

    #[test]
    fn test_lognormal_flat_smile() {
        // β = 1, ν = 0 is Black with vol α
        let sabr = SabrParams::new(0.2, 1.0, 0.0, 0.0).unwrap();
        for strike in [60.0, 100.0, 140.0] {
            assert_relative_eq!(
                sabr.implied_vol(100.0, strike).unwrap(),
                0.2,
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn test_rho_one_is_degenerate() {
        let sabr = SabrParams::new(0.2, 0.5, 1.0, 0.4).unwrap();
        assert!(sabr
            .implied_vol(100.0, 120.0)
            .unwrap_err()
            .is_numerical_degeneracy());
        // ATM still defined
        assert!(sabr.implied_vol(100.0, 100.0).is_ok());
    }

    #[test]
    fn test_params_validation() {
        assert!(SabrParams::new(-0.1, 0.5, 0.0, 0.3).is_err());
        assert!(SabrParams::new(0.1, 1.5, 0.0, 0.3).is_err());
        assert!(SabrParams::new(0.1, 0.5, -1.1, 0.3).is_err());
        assert!(SabrParams::new(0.1, 0.5, 0.0, -0.3).is_err());
    }

    #[test]
    fn test_fit_reproduces_synthetic_smile() {
        let truth = SabrParams::new(2.0, 0.5, -0.3, 0.5).unwrap();
        let quotes = (0..11)
            .map(|i| {
                let strike = 75.0 + 5.0 * i as f64;
                VolQuote::new(strike, truth.implied_vol(100.0, strike).unwrap())
            })
            .collect();
        let smile = VolSmile::new(1.0, quotes).unwrap();
        let fit = fit_sabr(100.0, &smile, &CalibrationConfig::default()).unwrap();

        assert!(fit.rmse() < 1e-4, "rmse = {}", fit.rmse());
        let p = fit.params;
        assert!(p.alpha >= 0.0 && (0.0..=1.0).contains(&p.beta) && p.nu >= 0.0);
        assert!(p.rho.abs() <= 1.0);
    }
}
