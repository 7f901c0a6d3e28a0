//! Raw SVI smile.
//!
//! Total variance in log-moneyness k = ln(K/F):
//!
//! ```text
//! w(k) = a + b·(ρ·(k - m) + √((k - m)² + σ²))
//! ```
//!
//! Quotes are fitted in volatility terms, σ_impl(k) = √w(k).

use std::fmt;

use pricer_core::market_data::VolSmile;
use pricer_core::traits::calibration::{
    CalibrationConfig, CalibrationResult, Calibrator, ParameterBounds,
};
use pricer_core::types::PricingError;

/// Fitted SVI parameters.
///
/// Admissible parameters satisfy a ≥ 0, b ≥ 0, |ρ| ≤ 1 and σ ≥ 0, which
/// keeps w(k) non-negative everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SviParams {
    /// Variance level
    pub a: f64,
    /// Wing slope
    pub b: f64,
    /// Skew
    pub rho: f64,
    /// Horizontal shift
    pub m: f64,
    /// Curvature at the vertex
    pub sigma: f64,
}

impl SviParams {
    /// Validated parameter set.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` when a parameter is non-finite or
    /// outside its bound.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::calibration::SviParams;
    ///
    /// let svi = SviParams::new(0.04, 0.2, -0.3, 0.0, 0.1).unwrap();
    /// assert!((svi.total_variance(0.0) - (0.04 + 0.2 * 0.1)).abs() < 1e-15);
    ///
    /// assert!(SviParams::new(0.04, -0.2, 0.0, 0.0, 0.1).is_err());
    /// ```
    pub fn new(a: f64, b: f64, rho: f64, m: f64, sigma: f64) -> Result<Self, PricingError> {
        let params = Self {
            a,
            b,
            rho,
            m,
            sigma,
        };
        let ok = params.as_vec().iter().all(|p| p.is_finite())
            && SviCalibrator::BOUNDS
                .iter()
                .zip(params.as_vec())
                .all(|(b, p)| b.contains(p));
        if !ok {
            return Err(PricingError::InvalidInput(format!(
                "SVI parameters out of bounds: {}",
                params
            )));
        }
        Ok(params)
    }

    /// Parameters in calibration order `[a, b, ρ, m, σ]`.
    pub fn as_vec(&self) -> Vec<f64> {
        vec![self.a, self.b, self.rho, self.m, self.sigma]
    }

    /// Total implied variance w(k).
    #[inline]
    pub fn total_variance(&self, k: f64) -> f64 {
        let x = k - self.m;
        self.a + self.b * (self.rho * x + (x * x + self.sigma * self.sigma).sqrt())
    }

    /// Implied volatility √w(k) at log-moneyness `k`.
    #[inline]
    pub fn implied_vol(&self, k: f64) -> f64 {
        self.total_variance(k).max(0.0).sqrt()
    }

    /// Implied volatility at `strike` for the given forward.
    #[inline]
    pub fn vol_at_strike(&self, forward: f64, strike: f64) -> f64 {
        self.implied_vol((strike / forward).ln())
    }
}

impl fmt::Display for SviParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "a={:.6} b={:.6} rho={:.6} m={:.6} sigma={:.6}",
            self.a, self.b, self.rho, self.m, self.sigma
        )
    }
}

/// Least-squares SVI fit to one expiry.
///
/// # Examples
/// ```
/// use pricer_core::market_data::{VolQuote, VolSmile};
/// use pricer_core::traits::calibration::{CalibrationConfig, Calibrator};
/// use pricer_models::calibration::{SviCalibrator, SviParams};
///
/// let truth = SviParams::new(0.03, 0.15, -0.4, 0.05, 0.2).unwrap();
/// let quotes = (0..15)
///     .map(|i| {
///         let strike = 70.0 + 5.0 * i as f64;
///         VolQuote::new(strike, truth.vol_at_strike(100.0, strike))
///     })
///     .collect();
/// let smile = VolSmile::new(0.5, quotes).unwrap();
///
/// let fit = SviCalibrator::new(100.0, &smile)
///     .unwrap()
///     .calibrate(&CalibrationConfig::default())
///     .unwrap();
/// assert!(fit.rmse() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct SviCalibrator {
    forward: f64,
    log_moneyness: Vec<f64>,
    market_vols: Vec<f64>,
}

impl SviCalibrator {
    const BOUNDS: [ParameterBounds; 5] = [
        ParameterBounds {
            min: 0.0,
            max: f64::INFINITY,
        },
        ParameterBounds {
            min: 0.0,
            max: f64::INFINITY,
        },
        ParameterBounds {
            min: -1.0,
            max: 1.0,
        },
        ParameterBounds {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        },
        ParameterBounds {
            min: 0.0,
            max: f64::INFINITY,
        },
    ];

    /// Calibrator for a smile around `forward`.
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
            log_moneyness: smile
                .quotes()
                .iter()
                .map(|q| (q.strike / forward).ln())
                .collect(),
            market_vols: smile.vols(),
        })
    }

    /// Forward used for log-moneyness.
    pub fn forward(&self) -> f64 {
        self.forward
    }

    /// ln(K/F) per quote, in strike order.
    pub fn log_moneyness(&self) -> &[f64] {
        &self.log_moneyness
    }

    fn params(p: &[f64]) -> SviParams {
        SviParams {
            a: p[0],
            b: p[1],
            rho: p[2],
            m: p[3],
            sigma: p[4],
        }
    }
}

impl Calibrator for SviCalibrator {
    type Params = SviParams;

    fn model_name(&self) -> &'static str {
        "SVI"
    }

    fn bounds(&self) -> Vec<ParameterBounds> {
        Self::BOUNDS.to_vec()
    }

    fn initial_guesses(&self) -> Vec<Vec<f64>> {
        let mut guesses = vec![vec![0.1, 0.1, 0.0, 0.0, 0.1]];

        // Vertex at the lowest quoted vol
        let vertex = self
            .log_moneyness
            .iter()
            .zip(&self.market_vols)
            .min_by(|a, b| a.1.total_cmp(b.1));
        if let Some((&k, &vol)) = vertex {
            let variance = vol * vol;
            guesses.push(vec![0.5 * variance, 0.1, 0.0, k, 0.1]);
            guesses.push(vec![0.5 * variance, 0.2, -0.5, k, 0.2]);
        }
        guesses
    }

    fn residuals(&self, p: &[f64]) -> Vec<f64> {
        let params = Self::params(p);
        self.log_moneyness
            .iter()
            .zip(&self.market_vols)
            .map(|(&k, &vol)| params.implied_vol(k) - vol)
            .collect()
    }

    fn params_from_slice(&self, p: &[f64]) -> SviParams {
        Self::params(p)
    }
}

/// Fit SVI to a smile.
pub fn fit_svi(
    forward: f64,
    smile: &VolSmile,
    config: &CalibrationConfig,
) -> Result<CalibrationResult<SviParams>, PricingError> {
    SviCalibrator::new(forward, smile)?.calibrate(config)
}
