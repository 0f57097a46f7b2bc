//! Normal CDF approximation used by the Kijko kernel estimator.

/// Hastings polynomial coefficients as used by the Kijko-NPG estimator.
///
/// The quadratic term is negative, so the curve is flatter than the
/// Abramowitz & Stegun 26.2.19 fit. Published Kijko regression values depend
/// on this set.
const HASTINGS_COEFFS: [f64; 4] = [0.196854, -0.115194, 0.000344, 0.019527];

/// Hastings rational form `1 - 0.5 (1 + a1|x| + a2|x|² + a3|x|³ + a4|x|⁴)^-4`,
/// reflected for negative arguments.
///
/// Arguments beyond ±5 saturate to 0 or 1. The result is symmetric about
/// `(0, 0.5)` and non-decreasing.
pub fn hastings_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x < -5.0 {
        return 0.0;
    }
    if x > 5.0 {
        return 1.0;
    }
    let upper = hastings_upper(x.abs());
    if x < 0.0 {
        1.0 - upper
    } else {
        upper
    }
}

fn hastings_upper(xa: f64) -> f64 {
    let [a1, a2, a3, a4] = HASTINGS_COEFFS;
    let poly = 1.0 + a1 * xa + a2 * xa.powi(2) + a3 * xa.powi(3) + a4 * xa.powi(4);
    1.0 - 0.5 * poly.powi(-4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_is_one_half() {
        assert_eq!(hastings_cdf(0.0), 0.5);
    }

    #[test]
    fn known_values() {
        assert!((hastings_cdf(1.0) - 0.6603879362547443).abs() < 1e-12);
        assert!((hastings_cdf(-1.5) - 0.30011454285393024).abs() < 1e-12);
        assert!((hastings_cdf(2.5) - 0.9111770630462133).abs() < 1e-12);
        assert!((hastings_cdf(0.5) - 0.6198216260585303).abs() < 1e-12);
    }

    #[test]
    fn saturates_in_tails() {
        assert_eq!(hastings_cdf(-5.5), 0.0);
        assert_eq!(hastings_cdf(7.0), 1.0);
        assert!(hastings_cdf(4.99) > 0.9999);
    }

    #[test]
    fn symmetric() {
        for x in [0.1, 0.7, 1.9, 3.3] {
            assert!((hastings_cdf(x) + hastings_cdf(-x) - 1.0).abs() < 1e-12);
        }
    }
}
