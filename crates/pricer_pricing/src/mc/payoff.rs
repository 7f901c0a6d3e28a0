//! Payoff evaluation on simulated paths and the running estimator.

use pricer_models::instruments::ContractSpec;

use super::paths::PathEnsemble;

/// Payoff of `contract` on one path (initial spot in column 0).
///
/// Terminal payoffs read the last column; Asian payoffs use the arithmetic
/// mean of the whole row, initial spot included.
#[inline]
pub fn path_payoff(contract: &ContractSpec, path: &[f64]) -> f64 {
    let underlying = if contract.payoff().is_path_dependent() {
        path.iter().sum::<f64>() / path.len() as f64
    } else {
        path[path.len() - 1]
    };
    contract.payoff_at(underlying)
}

/// Streaming sample mean and variance (Welford).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SampleStats {
    count: usize,
    mean: f64,
    m2: f64,
}

impl SampleStats {
    /// Add one observation.
    #[inline]
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Observations seen.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Sample mean; zero before the first observation.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Unbiased sample variance (n - 1); `None` below two observations.
    pub fn variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }

    /// Standard error of the mean; `None` below two observations.
    pub fn std_error(&self) -> Option<f64> {
        self.variance().map(|v| (v / self.count as f64).sqrt())
    }
}

/// Payoff statistics over every path of an ensemble, undiscounted.
pub fn ensemble_payoffs(contract: &ContractSpec, ensemble: &PathEnsemble) -> SampleStats {
    let mut stats = SampleStats::default();
    for path in ensemble.paths() {
        stats.push(path_payoff(contract, path));
    }
    stats
}
