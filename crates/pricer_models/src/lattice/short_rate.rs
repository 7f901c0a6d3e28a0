//! Multiplicative short-rate tree and the claims written on it.
//!
//! r(0, 0) = r₀, each up-move multiplies the rate by u and each down-move by
//! d. Claims are valued with probability 1/2 on each branch and discounted
//! by the node's own one-period rate:
//!
//! V(step, downs) = (V(step+1, downs) + V(step+1, downs+1)) / 2 / (1 + r(step, downs))
//!
//! The rate tree is built once and shared by every claim priced on it.

use pricer_core::types::PricingError;
use tracing::debug;

use super::{walk_back, TriangularLattice};

/// Interest rate option on a single reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RateOptionKind {
    /// Pays `max(0, r - K)` per unit notional.
    Caplet,
    /// Pays `max(0, K - r)` per unit notional.
    Floorlet,
}

impl RateOptionKind {
    fn payoff(self, rate: f64, strike: f64) -> f64 {
        match self {
            RateOptionKind::Caplet => (rate - strike).max(0.0),
            RateOptionKind::Floorlet => (strike - rate).max(0.0),
        }
    }
}

/// Recombining binomial tree of one-period short rates.
///
/// # Examples
/// ```
/// use pricer_models::lattice::ShortRateTree;
///
/// let tree = ShortRateTree::new(0.06, 1.25, 0.9, 4).unwrap();
/// assert_eq!(tree.rate(1, 0), Some(0.06 * 1.25));
/// assert_eq!(tree.rate(1, 1), Some(0.06 * 0.9));
///
/// let bond = tree.zero_coupon_bond(100.0, 1).unwrap();
/// assert!((bond.root() - 100.0 / 1.06).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ShortRateTree {
    r0: f64,
    up: f64,
    down: f64,
    rates: TriangularLattice<f64>,
}

impl ShortRateTree {
    /// Build a tree with `steps` one-period steps.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` for a non-finite r₀ or a non-positive
    /// up or down factor.
    pub fn new(r0: f64, up: f64, down: f64, steps: usize) -> Result<Self, PricingError> {
        if !r0.is_finite() {
            return Err(PricingError::InvalidInput(format!(
                "initial short rate must be finite, got {}",
                r0
            )));
        }
        if !(up > 0.0 && up.is_finite() && down > 0.0 && down.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "up and down factors must be positive, got u = {}, d = {}",
                up, down
            )));
        }

        // Top edge grows by u; every node below it is its upper-left parent times d
        let mut rates = TriangularLattice::new(steps, r0);
        for step in 1..=steps {
            let top = rates.layer(step - 1)[0] * up;
            rates.set(step, 0, top);
            for downs in 1..=step {
                let rate = rates.layer(step - 1)[downs - 1] * down;
                rates.set(step, downs, rate);
            }
        }
        debug!(steps, r0, up, down, "short-rate tree built");

        Ok(Self {
            r0,
            up,
            down,
            rates,
        })
    }

    /// Initial short rate.
    pub fn r0(&self) -> f64 {
        self.r0
    }

    /// Up factor u.
    pub fn up(&self) -> f64 {
        self.up
    }

    /// Down factor d.
    pub fn down(&self) -> f64 {
        self.down
    }

    /// Number of steps in the tree.
    pub fn steps(&self) -> usize {
        self.rates.steps()
    }

    /// Short rate at `(step, downs)`.
    pub fn rate(&self, step: usize, downs: usize) -> Option<f64> {
        self.rates.get(step, downs)
    }

    /// The whole rate lattice.
    pub fn rates(&self) -> &TriangularLattice<f64> {
        &self.rates
    }

    fn discounted_mean(&self) -> impl Fn(usize, usize, f64, f64) -> f64 + '_ {
        move |step, downs, up, down| (up + down) / 2.0 / (1.0 + self.rates.layer(step)[downs])
    }

    fn require_steps(&self, needed: usize, what: &str) -> Result<(), PricingError> {
        if needed > self.steps() {
            return Err(PricingError::InvalidInput(format!(
                "{} needs {} rate steps but the tree has {}",
                what,
                needed,
                self.steps()
            )));
        }
        Ok(())
    }

    /// Value lattice of a zero-coupon bond paying `face` after `maturity`
    /// periods.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` for a zero maturity, a non-positive face
    /// value, or a maturity beyond the tree.
    pub fn zero_coupon_bond(
        &self,
        face: f64,
        maturity: usize,
    ) -> Result<TriangularLattice<f64>, PricingError> {
        if maturity == 0 {
            return Err(PricingError::InvalidInput(
                "bond maturity must be at least one period".to_string(),
            ));
        }
        if !(face > 0.0 && face.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "face value must be positive, got {}",
                face
            )));
        }
        // Rates at the maturity layer are never read
        self.require_steps(maturity - 1, "zero-coupon bond")?;

        let values = walk_back(maturity, |_| face, self.discounted_mean(), None);
        debug!(
            face,
            maturity,
            price = values.root(),
            "zero-coupon bond valued"
        );
        Ok(values)
    }

    /// Value lattice of a European call on a bond, struck at `strike` and
    /// expiring after `expiry` periods.
    ///
    /// `bond` is the bond's own value lattice from
    /// [`ShortRateTree::zero_coupon_bond`].
    ///
    /// # Errors
    /// `PricingError::InvalidInput` when `expiry` is zero, exceeds the
    /// bond's maturity, or the strike is negative.
    pub fn bond_option(
        &self,
        bond: &TriangularLattice<f64>,
        strike: f64,
        expiry: usize,
    ) -> Result<TriangularLattice<f64>, PricingError> {
        if expiry == 0 || expiry > bond.steps() {
            return Err(PricingError::InvalidInput(format!(
                "option expiry {} must lie in [1, {}]",
                expiry,
                bond.steps()
            )));
        }
        if !(strike >= 0.0 && strike.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "bond option strike must be non-negative, got {}",
                strike
            )));
        }
        self.require_steps(expiry - 1, "bond option")?;

        let payoff = bond.layer(expiry);
        let values = walk_back(
            expiry,
            |downs| (payoff[downs] - strike).max(0.0),
            self.discounted_mean(),
            None,
        );
        debug!(strike, expiry, price = values.root(), "bond option valued");
        Ok(values)
    }

    /// Value lattice of a caplet or floorlet on the rate observed at
    /// period `expiry - 1`.
    ///
    /// The payoff `notional·max(0, ±(r - K)) / (1 + r)` is settled at the
    /// fixing node, already discounted by the fixed rate, and rolled back
    /// to the root.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` for a zero expiry, a negative notional,
    /// or an expiry beyond the tree.
    pub fn rate_option(
        &self,
        kind: RateOptionKind,
        strike: f64,
        expiry: usize,
        notional: f64,
    ) -> Result<TriangularLattice<f64>, PricingError> {
        if expiry == 0 {
            return Err(PricingError::InvalidInput(
                "rate option expiry must be at least one period".to_string(),
            ));
        }
        if !(notional >= 0.0 && notional.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "notional must be non-negative, got {}",
                notional
            )));
        }
        let fixing = expiry - 1;
        self.require_steps(fixing, "rate option")?;

        let fixing_rates = self.rates.layer(fixing);
        let values = walk_back(
            fixing,
            |downs| {
                let rate = fixing_rates[downs];
                notional * kind.payoff(rate, strike) / (1.0 + rate)
            },
            self.discounted_mean(),
            None,
        );
        debug!(?kind, strike, expiry, price = values.root(), "rate option valued");
        Ok(values)
    }

    /// Caplet value lattice. See [`ShortRateTree::rate_option`].
    pub fn caplet(
        &self,
        strike: f64,
        expiry: usize,
        notional: f64,
    ) -> Result<TriangularLattice<f64>, PricingError> {
        self.rate_option(RateOptionKind::Caplet, strike, expiry, notional)
    }

    /// Floorlet value lattice. See [`ShortRateTree::rate_option`].
    pub fn floorlet(
        &self,
        strike: f64,
        expiry: usize,
        notional: f64,
    ) -> Result<TriangularLattice<f64>, PricingError> {
        self.rate_option(RateOptionKind::Floorlet, strike, expiry, notional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tree(steps: usize) -> ShortRateTree {
        ShortRateTree::new(0.06, 1.25, 0.9, steps).unwrap()
    }

    #[test]
    fn test_rate_nodes() {
        let t = tree(3);
        assert_relative_eq!(t.rate(2, 0).unwrap(), 0.06 * 1.25 * 1.25, epsilon = 1e-15);
        assert_relative_eq!(t.rate(2, 1).unwrap(), 0.06 * 1.25 * 0.9, epsilon = 1e-15);
        assert_relative_eq!(
            t.rate(3, 3).unwrap(),
            0.06 * 0.9_f64.powi(3),
            epsilon = 1e-15
        );
        assert_eq!(t.rates().len(), 10);
    }

    #[test]
    fn test_one_step_bond() {
        let bond = tree(1).zero_coupon_bond(100.0, 1).unwrap();
        assert_relative_eq!(bond.root(), (100.0 + 100.0) / 2.0 / 1.06, epsilon = 1e-12);
        assert_relative_eq!(bond.root(), 94.339_622_641_509_44, epsilon = 1e-10);
        assert_eq!(bond.steps(), 1);
    }

    #[test]
    fn test_four_year_bond() {
        let bond = tree(4).zero_coupon_bond(100.0, 4).unwrap();
        assert_relative_eq!(bond.root(), 77.217_740_328_716, epsilon = 1e-9);
        assert!(bond.layer(4).iter().all(|&v| v == 100.0));
    }

    #[test]
    fn test_bond_option_uses_bond_lattice() {
        let t = tree(4);
        let bond = t.zero_coupon_bond(100.0, 4).unwrap();
        let option = t.bond_option(&bond, 84.0, 2).unwrap();
        assert_relative_eq!(option.root(), 2.969_474_453_180_651, epsilon = 1e-9);
        for (v, b) in option.layer(2).iter().zip(bond.layer(2)) {
            assert_relative_eq!(*v, (b - 84.0).max(0.0));
        }
    }

    #[test]
    fn test_bond_option_expiry_beyond_bond() {
        let t = tree(4);
        let bond = t.zero_coupon_bond(100.0, 2).unwrap();
        assert!(t.bond_option(&bond, 90.0, 3).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_caplet_and_floorlet() {
        let t = tree(5);
        let caplet = t.caplet(0.02, 6, 1000.0).unwrap();
        let floorlet = t.floorlet(0.08, 6, 1000.0).unwrap();
        assert_relative_eq!(caplet.root(), 42.045_224_917_924_685, epsilon = 1e-8);
        assert_relative_eq!(floorlet.root(), 7.053_704_436_075_451, epsilon = 1e-8);
        assert_eq!(caplet.steps(), 5);
    }

    #[test]
    fn test_caplet_settles_at_fixing() {
        let t = tree(0);
        let caplet = t.caplet(0.05, 1, 1.0).unwrap();
        assert_relative_eq!(caplet.root(), 0.01 / 1.06, epsilon = 1e-15);
    }

    #[test]
    fn test_tree_too_short() {
        let t = tree(2);
        assert!(t.zero_coupon_bond(100.0, 5).unwrap_err().is_invalid_input());
        assert!(t.caplet(0.02, 6, 1.0).is_err());
    }

    #[test]
    fn test_invalid_factors() {
        assert!(ShortRateTree::new(0.05, 0.0, 0.9, 2).is_err());
        assert!(ShortRateTree::new(f64::NAN, 1.1, 0.9, 2).is_err());
    }
}
