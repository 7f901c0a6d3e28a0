//! Random number generation for path simulation.
//!
//! Simulation code never creates its own randomness; it draws from a
//! [`NormalGenerator`] handed in by the caller. Production runs use the
//! seeded [`PricerRng`]; tests can pin the stream with [`ScriptedNormals`].
//!
//! ```rust
//! use pricer_pricing::rng::{NormalGenerator, PricerRng};
//!
//! let mut rng = PricerRng::from_seed(12345);
//! let mut buffer = vec![0.0; 1000];
//! rng.fill_normal(&mut buffer);
//! ```

mod prng;
mod scripted;

pub use prng::PricerRng;
pub use scripted::ScriptedNormals;

/// Source of independent standard normal variates.
pub trait NormalGenerator {
    /// Next N(0, 1) draw.
    fn next_normal(&mut self) -> f64;

    /// Fill `buffer` with consecutive draws.
    #[inline]
    fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = self.next_normal();
        }
    }
}

impl<G: NormalGenerator + ?Sized> NormalGenerator for &mut G {
    #[inline]
    fn next_normal(&mut self) -> f64 {
        (**self).next_normal()
    }
}
