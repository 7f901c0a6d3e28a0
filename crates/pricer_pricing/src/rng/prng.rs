//! Seeded pseudo-random generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

use super::NormalGenerator;

/// Monte Carlo random number generator.
///
/// Wraps `StdRng` and remembers its seed so a run can be logged and
/// replayed. Normal draws use the Ziggurat sampler behind
/// `rand_distr::StandardNormal`.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::{NormalGenerator, PricerRng};
///
/// let mut a = PricerRng::from_seed(12345);
/// let mut b = PricerRng::from_seed(12345);
/// assert_eq!(a.next_normal(), b.next_normal());
/// assert_eq!(a.seed(), 12345);
/// ```
#[derive(Debug, Clone)]
pub struct PricerRng {
    inner: StdRng,
    seed: u64,
}

impl PricerRng {
    /// Generator initialised with `seed`.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Generator with a seed drawn from the thread-local entropy source.
    /// The chosen seed is still available through [`PricerRng::seed`].
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    /// Seed used for initialisation.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in [0, 1).
    #[inline]
    pub fn gen_uniform(&mut self) -> f64 {
        self.inner.gen()
    }
}

impl NormalGenerator for PricerRng {
    #[inline]
    fn next_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }
}
