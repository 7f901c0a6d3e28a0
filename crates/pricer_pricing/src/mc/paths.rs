//! Geometric Brownian motion path generation.
//!
//! Paths use the exact log-space step
//!
//! ```text
//! S(t+dt) = S(t) × exp((r - q - σ²/2)dt + σ√dt × Z)
//! ```
//!
//! so the terminal distribution is exact for any step count; steps only
//! matter for path-dependent payoffs.
//!
//! # Memory Layout
//!
//! Paths are stored in row-major order: `data[k * (steps + 1) + t]`, where
//! column 0 holds the initial spot.

use pricer_core::market_data::MarketObservation;
use pricer_core::types::PricingError;

use crate::rng::NormalGenerator;

/// Per-step constants of a GBM simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmDynamics {
    spot: f64,
    drift_dt: f64,
    vol_sqrt_dt: f64,
    dt: f64,
    steps: usize,
}

impl GbmDynamics {
    /// Dynamics for `market` over `expiry` years in `steps` equal steps.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` for a non-positive or non-finite expiry
    /// or zero steps.
    pub fn new(
        market: &MarketObservation,
        expiry: f64,
        steps: usize,
    ) -> Result<Self, PricingError> {
        if !(expiry > 0.0 && expiry.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "expiry must be positive and finite, got {}",
                expiry
            )));
        }
        if steps == 0 {
            return Err(PricingError::InvalidInput(
                "path simulation needs at least one step".to_string(),
            ));
        }
        let dt = expiry / steps as f64;
        let sigma = market.volatility();
        Ok(Self {
            spot: market.spot(),
            drift_dt: (market.rate() - market.dividend_yield() - 0.5 * sigma * sigma) * dt,
            vol_sqrt_dt: sigma * dt.sqrt(),
            dt,
            steps,
        })
    }

    /// Time step T/n.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of time steps n.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Write one path into `row` (length `steps + 1`), drawing `steps`
    /// normals from `rng` in time order.
    #[inline]
    pub fn fill_path<G: NormalGenerator + ?Sized>(&self, row: &mut [f64], rng: &mut G) {
        debug_assert_eq!(row.len(), self.steps + 1);
        row[0] = self.spot;
        for t in 1..row.len() {
            let z = rng.next_normal();
            row[t] = row[t - 1] * (self.drift_dt + self.vol_sqrt_dt * z).exp();
        }
    }
}

/// Matrix of simulated price paths, `simulations × (steps + 1)`.
///
/// Built for inspection and plotting; pricing streams paths one at a time
/// and never holds the whole matrix.
///
/// # Examples
///
/// ```rust
/// use pricer_core::market_data::MarketObservation;
/// use pricer_pricing::mc::PathEnsemble;
/// use pricer_pricing::rng::PricerRng;
///
/// let market = MarketObservation::new(100.0, 0.2, 0.0, 0.05).unwrap();
/// let mut rng = PricerRng::from_seed(1);
/// let ensemble = PathEnsemble::simulate(&market, 1.0, 12, 50, &mut rng).unwrap();
///
/// assert_eq!(ensemble.simulations(), 50);
/// assert_eq!(ensemble.path(0).unwrap().len(), 13);
/// assert_eq!(ensemble.path(0).unwrap()[0], 100.0);
/// assert_eq!(ensemble.terminal().len(), 50);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PathEnsemble {
    simulations: usize,
    steps: usize,
    dt: f64,
    data: Vec<f64>,
}

impl PathEnsemble {
    /// Simulate `simulations` independent paths of `steps` steps.
    ///
    /// Path k consumes draws `k * steps .. (k + 1) * steps` of `rng`.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` for a bad expiry, zero steps or zero
    /// simulations.
    pub fn simulate<G: NormalGenerator + ?Sized>(
        market: &MarketObservation,
        expiry: f64,
        steps: usize,
        simulations: usize,
        rng: &mut G,
    ) -> Result<Self, PricingError> {
        if simulations == 0 {
            return Err(PricingError::InvalidInput(
                "path simulation needs at least one path".to_string(),
            ));
        }
        let dynamics = GbmDynamics::new(market, expiry, steps)?;
        let mut data = vec![0.0; simulations * (steps + 1)];
        for row in data.chunks_exact_mut(steps + 1) {
            dynamics.fill_path(row, rng);
        }
        Ok(Self {
            simulations,
            steps,
            dt: dynamics.dt(),
            data,
        })
    }

    /// Number of paths.
    #[inline]
    pub fn simulations(&self) -> usize {
        self.simulations
    }

    /// Number of time steps per path.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Time step T/n.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Path `k`, including the initial spot.
    pub fn path(&self, k: usize) -> Option<&[f64]> {
        let width = self.steps + 1;
        self.data.get(k * width..(k + 1) * width)
    }

    /// All paths in simulation order.
    pub fn paths(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.steps + 1)
    }

    /// Final column: the price at expiry of every path.
    pub fn terminal(&self) -> Vec<f64> {
        self.paths().map(|p| p[self.steps]).collect()
    }

    /// Observation times 0, dt, ..., T.
    pub fn times(&self) -> Vec<f64> {
        (0..=self.steps).map(|t| t as f64 * self.dt).collect()
    }
}
