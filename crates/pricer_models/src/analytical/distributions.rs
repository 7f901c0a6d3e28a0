//! Standard normal distribution functions.
//!
//! - `norm_cdf`: Cumulative distribution function (CDF)
//! - `norm_pdf`: Probability density function (PDF)
//!
//! `norm_cdf` uses Hart's double-precision rational approximation (as
//! arranged by West, 2005), accurate to roughly 1e-14 across the real line.
//! Implied volatility inversion and deep out-of-the-money digitals rely on
//! that accuracy in the tails.

use num_traits::Float;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// sqrt(2 * pi)
const SQRT_2PI: f64 = 2.506_628_274_631_000_5;

/// Below this |x| the rational approximation is used; above it the
/// continued fraction.
const RATIONAL_CUTOFF: f64 = 7.071_067_811_865_47;

/// Beyond this |x| the tail probability underflows double precision.
const TAIL_CUTOFF: f64 = 37.0;

const NUMERATOR: [f64; 7] = [
    3.526_249_659_989_11e-2,
    0.700_383_064_443_688,
    6.373_962_203_531_65,
    33.912_866_078_383,
    112.079_291_497_871,
    221.213_596_169_931,
    220.206_867_912_376,
];

const DENOMINATOR: [f64; 8] = [
    8.838_834_764_831_84e-2,
    1.755_667_163_182_64,
    16.064_177_579_207,
    86.780_732_202_946_1,
    296.564_248_779_674,
    637.333_633_378_831,
    793.826_512_519_948,
    440.413_735_824_752,
];

#[inline]
fn constant<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

#[inline]
fn horner<T: Float>(coefficients: &[f64], x: T) -> T {
    coefficients
        .iter()
        .fold(T::zero(), |acc, &c| acc * x + constant(c))
}

/// Standard normal cumulative distribution function.
///
/// Computes P(X <= x) where X ~ N(0, 1).
///
/// # Arguments
/// * `x` - Input value
///
/// # Returns
/// The probability P(X <= x), in [0, 1]. NaN propagates.
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-15);
/// assert!((norm_cdf(1.0_f64) - 0.841_344_746_068_542_9).abs() < 1e-13);
/// assert!(norm_cdf(-40.0_f64) == 0.0);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    if x.is_nan() {
        return x;
    }
    let abs_x = x.abs();
    let tail = if abs_x > constant(TAIL_CUTOFF) {
        T::zero()
    } else {
        let gaussian = (-abs_x * abs_x / constant(2.0)).exp();
        if abs_x < constant(RATIONAL_CUTOFF) {
            gaussian * horner(&NUMERATOR, abs_x) / horner(&DENOMINATOR, abs_x)
        } else {
            // Continued fraction for the far tail
            let mut build = abs_x + constant(0.65);
            build = abs_x + constant::<T>(4.0) / build;
            build = abs_x + constant::<T>(3.0) / build;
            build = abs_x + constant::<T>(2.0) / build;
            build = abs_x + T::one() / build;
            gaussian / build / constant(SQRT_2PI)
        }
    };
    if x > T::zero() {
        T::one() - tail
    } else {
        tail
    }
}

/// Standard normal probability density function.
///
/// φ(x) = (1 / sqrt(2π)) * exp(-x² / 2)
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_pdf;
///
/// // φ(0) = 1 / sqrt(2π) ≈ 0.3989
/// assert!((norm_pdf(0.0_f64) - 0.3989422804).abs() < 1e-9);
/// ```
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    constant::<T>(FRAC_1_SQRT_2PI) * (-x * x / constant(2.0)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ==========================================================
    // norm_cdf tests
    // ==========================================================

    #[test]
    fn test_norm_cdf_at_zero() {
        assert_relative_eq!(norm_cdf(0.0_f64), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for x in [-6.0, -3.0, -1.0, -0.5, 0.5, 1.0, 2.0, 3.0, 8.0] {
            assert_relative_eq!(norm_cdf(x) + norm_cdf(-x), 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_relative_eq!(norm_cdf(1.0_f64), 0.841_344_746_068_542_9, epsilon = 1e-13);
        assert_relative_eq!(
            norm_cdf(-1.0_f64),
            0.158_655_253_931_457_05,
            epsilon = 1e-13
        );
        assert_relative_eq!(norm_cdf(2.0_f64), 0.977_249_868_051_820_8, epsilon = 1e-13);
        assert_relative_eq!(
            norm_cdf(-2.0_f64),
            0.022_750_131_948_179_195,
            epsilon = 1e-13
        );
        assert_relative_eq!(norm_cdf(3.0_f64), 0.998_650_101_968_369_9, epsilon = 1e-13);
    }

    #[test]
    fn test_norm_cdf_tail_relative_accuracy() {
        // Φ(-5) = 2.866515718791939e-7, Φ(-10) = 7.619853024160527e-24
        assert_relative_eq!(
            norm_cdf(-5.0_f64),
            2.866_515_718_791_939e-7,
            max_relative = 1e-8
        );
        assert_relative_eq!(
            norm_cdf(-10.0_f64),
            7.619_853_024_160_527e-24,
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_norm_cdf_extreme_values() {
        assert_eq!(norm_cdf(-40.0_f64), 0.0);
        assert_eq!(norm_cdf(40.0_f64), 1.0);
        assert!(norm_cdf(f64::NAN).is_nan());
    }

    #[test]
    fn test_norm_cdf_monotonic() {
        let values: Vec<f64> = (-50..=50).map(|i| i as f64 * 0.1).collect();
        for pair in values.windows(2) {
            assert!(
                norm_cdf(pair[1]) > norm_cdf(pair[0]),
                "CDF not monotonic at x = {}",
                pair[0]
            );
        }
    }

    #[test]
    fn test_norm_cdf_f32_compatibility() {
        assert!((norm_cdf(0.0_f32) - 0.5).abs() < 1e-6);
    }

    // ==========================================================
    // norm_pdf tests
    // ==========================================================

    #[test]
    fn test_norm_pdf_reference_values() {
        assert_relative_eq!(norm_pdf(0.0_f64), FRAC_1_SQRT_2PI, epsilon = 1e-15);
        assert_relative_eq!(norm_pdf(1.0_f64), 0.241_970_724_519_143_37, epsilon = 1e-14);
        assert_relative_eq!(
            norm_pdf(-2.0_f64),
            0.053_990_966_513_188_06,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_cdf_derivative_is_pdf() {
        let h = 1e-5;
        for x in [-2.0, -1.0, 0.0, 1.0, 2.0] {
            let numerical = (norm_cdf(x + h) - norm_cdf(x - h)) / (2.0 * h);
            assert_relative_eq!(numerical, norm_pdf(x), epsilon = 1e-8);
        }
    }
}
