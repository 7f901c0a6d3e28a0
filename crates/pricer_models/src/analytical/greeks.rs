//! First and second order sensitivities.

use std::fmt;

use num_traits::Float;

use crate::instruments::Position;

/// Analytic option sensitivities.
///
/// Units follow trading-desk conventions: theta per calendar day, vega per
/// 1% of volatility, rho per 1% of rate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Greeks<T: Float> {
    /// ∂V/∂S
    pub delta: T,
    /// ∂²V/∂S²
    pub gamma: T,
    /// Value change over one calendar day
    pub theta: T,
    /// Value change for a 1% volatility move
    pub vega: T,
    /// Value change for a 1% rate move
    pub rho: T,
}

impl<T: Float> Greeks<T> {
    /// Sensitivities seen from the given side of the trade.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::Greeks;
    /// use pricer_models::instruments::Position;
    ///
    /// let long = Greeks { delta: 0.6, gamma: 0.02, theta: -0.01, vega: 0.4, rho: 0.5 };
    /// let short = long.signed(Position::Short);
    /// assert_eq!(short.delta, -0.6);
    /// assert_eq!(short.theta, 0.01);
    /// ```
    pub fn signed(self, position: Position) -> Self {
        match position {
            Position::Long => self,
            Position::Short => Self {
                delta: -self.delta,
                gamma: -self.gamma,
                theta: -self.theta,
                vega: -self.vega,
                rho: -self.rho,
            },
        }
    }
}

impl<T: Float + fmt::Display> fmt::Display for Greeks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delta={:.6} gamma={:.6} theta={:.6} vega={:.6} rho={:.6}",
            self.delta, self.gamma, self.theta, self.vega, self.rho
        )
    }
}
