//! Kijko non-parametric Gaussian maximum magnitude.
//!
//! The magnitude density of the `N` largest events is estimated with a
//! Gaussian kernel of bandwidth `h`, and `mmax` solves the fixed point
//!
//! ```text
//! mmax = m_obs + ∫[m_min, mmax] (F(m))^N dm
//! F(m) = Σ_i [Φ((m - m_i)/h) - Φ((m_min - m_i)/h)]
//!      / Σ_i [Φ((mmax - m_i)/h) - Φ((m_min - m_i)/h)]
//! ```
//!
//! The integral is evaluated on points spaced uniformly in `exp(m)`, so
//! they crowd towards the upper limit where `F^N` changes fastest.

use qk_common::{Error, Result};
use qk_config::ObservedMax;
use qk_math::{cunnane_quantile, exp_spaced, hastings_cdf, nonuniform_trapezoid, round_to, Convergence};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Floor on the kernel CDF normaliser.
const NORMALISER_FLOOR: f64 = 1e-14;

/// Kernel CDF term for a standardised distance `z`.
///
/// The lower tail is clamped before reflection, so a point more than five
/// bandwidths below a sample magnitude contributes 1 rather than 0.
fn kernel_cdf(z: f64) -> f64 {
    if z < -5.0 {
        1.0
    } else {
        hastings_cdf(z)
    }
}

/// Controls for the fixed-point iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KijkoParams {
    /// Number of largest events in the kernel sample.
    pub number_earthquakes: usize,
    /// Integration points per iteration.
    pub number_samples: usize,
    pub tolerance: f64,
    pub max_iterations: usize,
}

/// Kijko estimate with the kernel bandwidth used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KijkoEstimate {
    pub mmax: f64,
    pub sigma: f64,
    pub bandwidth: f64,
    pub convergence: Convergence,
}

/// Silverman bandwidth `0.9 (IQR / 1.34) n^(-1/5)`, rounded to two decimals.
///
/// Quartiles use Cunnane plotting positions.
pub fn h_smooth(magnitudes: &[f64]) -> f64 {
    let mut sorted = magnitudes.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;
    let iqr = cunnane_quantile(&sorted, 0.75) - cunnane_quantile(&sorted, 0.25);
    round_to(0.9 * (iqr / 1.34) * n.powf(-1.0 / 5.0), 2)
}

/// `∫ F(m)^neq dm` over `points`, the first and last of which bound the support.
pub fn kijko_integral(points: &[f64], sample: &[f64], h: f64, neq: f64) -> f64 {
    let (Some(&lower), Some(&upper)) = (points.first(), points.last()) else {
        return 0.0;
    };
    let p_lower: Vec<f64> = sample.iter().map(|m| kernel_cdf((lower - m) / h)).collect();
    let normaliser: f64 = sample
        .iter()
        .zip(&p_lower)
        .map(|(m, p0)| kernel_cdf((upper - m) / h) - p0)
        .sum::<f64>()
        .max(NORMALISER_FLOOR);

    let cdf: Vec<f64> = points
        .iter()
        .map(|&x| {
            let num: f64 = sample
                .iter()
                .zip(&p_lower)
                .map(|(m, p0)| kernel_cdf((x - m) / h) - p0)
                .sum();
            (num / normaliser).powf(neq)
        })
        .collect();
    nonuniform_trapezoid(points, &cdf)
}

/// Kijko-NPG maximum magnitude of `magnitudes` with per-event `sigmas`.
///
/// The observed maximum is the largest catalog magnitude (first occurrence)
/// with its uncertainty, unless `observed` overrides it.
pub fn kijko_npg(
    magnitudes: &[f64],
    sigmas: &[f64],
    params: &KijkoParams,
    observed: Option<ObservedMax>,
) -> Result<KijkoEstimate> {
    if magnitudes.len() != sigmas.len() {
        return Err(Error::length_mismatch(
            "kijko magnitudes/sigmas",
            magnitudes.len(),
            sigmas.len(),
        ));
    }
    if magnitudes.len() < 2 {
        return Err(Error::InsufficientData {
            what: "kijko kernel sample".to_string(),
            needed: 2,
            got: magnitudes.len(),
        });
    }

    let observed = observed.unwrap_or_else(|| {
        let mut imax = 0;
        for (i, &m) in magnitudes.iter().enumerate() {
            if m > magnitudes[imax] {
                imax = i;
            }
        }
        ObservedMax {
            magnitude: magnitudes[imax],
            sigma: sigmas[imax],
        }
    });

    let (sample, neq) = if magnitudes.len() <= params.number_earthquakes {
        (magnitudes.to_vec(), magnitudes.len() as f64)
    } else {
        let mut sorted = magnitudes.to_vec();
        sorted.sort_by(f64::total_cmp);
        let top = sorted.split_off(sorted.len() - params.number_earthquakes);
        (top, params.number_earthquakes as f64)
    };
    let m_min = sample.iter().copied().fold(f64::INFINITY, f64::min);
    let h = h_smooth(&sample);
    if !(h > 0.0) {
        return Err(Error::NumericalInstability(format!(
            "kernel bandwidth is {} for the {} largest magnitudes",
            h, neq
        )));
    }

    let mut mmax = observed.magnitude;
    let mut delta = 0.0;
    let mut iterations = 0;
    let convergence = loop {
        let points = exp_spaced(m_min, mmax, params.number_samples);
        delta = kijko_integral(&points, &sample, h, neq);
        let next = observed.magnitude + delta;
        let change = (next - mmax).abs();
        mmax = next;
        iterations += 1;
        if change <= params.tolerance {
            break Convergence::converged(iterations);
        }
        if iterations >= params.max_iterations {
            warn!(iterations, change, "kijko iteration cap reached");
            break Convergence::capped(iterations);
        }
    };

    let sigma = observed.sigma.hypot(delta);
    debug!(mmax, sigma, bandwidth = h, iterations, "kijko-npg estimate");
    Ok(KijkoEstimate {
        mmax,
        sigma,
        bandwidth: h,
        convergence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> KijkoParams {
        KijkoParams {
            number_earthquakes: 100,
            number_samples: 51,
            tolerance: 0.01,
            max_iterations: 1000,
        }
    }

    #[test]
    fn bandwidth_uses_cunnane_quartiles() {
        let mags: Vec<f64> = (0..20).map(|k| 5.0 + 0.1 * k as f64).collect();
        // IQR = 1.0 for an evenly spaced sample of 20
        let expected = round_to(0.9 / 1.34 * 20f64.powf(-0.2), 2);
        assert_eq!(h_smooth(&mags), expected);
        assert_eq!(expected, 0.37);
    }

    #[test]
    fn integral_is_bounded_by_interval() {
        let sample = [5.0, 5.2, 5.4, 5.6, 5.8];
        let points = exp_spaced(5.0, 6.0, 51);
        let value = kijko_integral(&points, &sample, 0.2, 5.0);
        assert!((value - 0.20889187962743727).abs() < 1e-9);
    }

    #[test]
    fn mmax_exceeds_observed_maximum() {
        let mags = [5.0, 5.3, 5.1, 5.8, 5.4, 6.1, 5.2, 5.6];
        let sigmas = [0.1; 8];
        let est = kijko_npg(&mags, &sigmas, &params(), None).unwrap();
        assert!(est.mmax > 6.1);
        assert!((est.mmax - 6.329110551115779).abs() < 1e-6);
        assert!((est.sigma - 0.24998328870661726).abs() < 1e-6);
        assert_eq!(est.bandwidth, 0.25);
        assert_eq!(est.convergence, Convergence::converged(4));
    }

    #[test]
    fn observed_override_shifts_estimate() {
        let mags = [5.0, 5.3, 5.1, 5.8, 5.4, 6.1, 5.2, 5.6];
        let sigmas = [0.1; 8];
        let base = kijko_npg(&mags, &sigmas, &params(), None).unwrap();
        let shifted = kijko_npg(
            &mags,
            &sigmas,
            &params(),
            Some(ObservedMax {
                magnitude: 6.5,
                sigma: 0.3,
            }),
        )
        .unwrap();
        assert!(shifted.mmax > base.mmax);
        assert!(shifted.sigma >= 0.3);
    }

    #[test]
    fn iteration_cap_is_reported() {
        let mags = [5.0, 5.3, 5.1, 5.8, 5.4, 6.1, 5.2, 5.6];
        let sigmas = [0.1; 8];
        let p = KijkoParams {
            tolerance: 1e-300,
            max_iterations: 2,
            ..params()
        };
        let est = kijko_npg(&mags, &sigmas, &p, None).unwrap();
        assert_eq!(est.convergence, Convergence::capped(2));
    }

    #[test]
    fn kernel_lower_tail_is_clamped_before_reflection() {
        assert_eq!(kernel_cdf(-5.5), 1.0);
        assert_eq!(kernel_cdf(5.5), 1.0);
        assert!((kernel_cdf(-4.0) - hastings_cdf(-4.0)).abs() < 1e-15);
        assert!((kernel_cdf(1.0) - 0.6603879362547443).abs() < 1e-12);
    }

    #[test]
    fn wide_sample_crosses_the_clamped_tail() {
        // Spread of 1.3 magnitude units over h = 0.1 reaches |z| > 5.
        let sample = [5.2, 5.5, 5.8, 6.1, 6.5];
        let points = exp_spaced(5.2, 6.5, 51);
        let value = kijko_integral(&points, &sample, 0.1, 5.0);
        assert!((value - 0.06364876433638328).abs() < 1e-9);
    }

    #[test]
    fn degenerate_samples_fail() {
        assert_eq!(kijko_npg(&[6.0], &[0.1], &params(), None).unwrap_err().code(), 22);
        let err = kijko_npg(&[6.0; 5], &[0.1; 5], &params(), None).unwrap_err();
        assert_eq!(err.code(), 31);
    }
}
