//! Cumulative seismic moment maximum magnitude (Makropoulos & Burton 1983).
//!
//! Annual moment release is summed year by year and compared with a
//! constant-rate line. The largest excursions above and below that line
//! bound the moment of the largest event the region can store.

use qk_common::{Error, Result};
use qk_math::{mean, std_dev};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::{debug, trace};

/// `log10 M0 = 9.05 + 1.5 Mw`, moment in N·m.
const MOMENT_INTERCEPT: f64 = 9.05;
const MOMENT_SLOPE: f64 = 1.5;

/// Longest catalog, in years, the annual release series is built for.
const MAX_YEAR_SPAN: i64 = 100_000;

fn moment(magnitude: f64) -> f64 {
    10f64.powf(MOMENT_INTERCEPT + MOMENT_SLOPE * magnitude)
}

fn moment_magnitude(moment: f64) -> f64 {
    (moment.log10() - MOMENT_INTERCEPT) / MOMENT_SLOPE
}

/// Maximum magnitude from the cumulative moment excursion of a catalog.
pub fn cumulative_moment(years: &[i32], magnitudes: &[f64]) -> Result<f64> {
    if years.len() != magnitudes.len() {
        return Err(Error::length_mismatch(
            "cumulative moment years/magnitudes",
            years.len(),
            magnitudes.len(),
        ));
    }
    let (Some(&first), Some(&last)) = (years.iter().min(), years.iter().max()) else {
        return Err(Error::EmptyInput("cumulative moment catalog".to_string()));
    };

    let span = i64::from(last) - i64::from(first) + 1;
    if span > MAX_YEAR_SPAN {
        return Err(Error::InvalidInput(format!(
            "cumulative moment catalog spans {} years ({} to {}), limit is {}",
            span, first, last, MAX_YEAR_SPAN
        )));
    }
    let span = span as usize;
    let mut annual = vec![0.0; span];
    for (&year, &m) in years.iter().zip(magnitudes) {
        annual[(i64::from(year) - i64::from(first)) as usize] += moment(m);
    }
    let average = annual.iter().sum::<f64>() / span as f64;

    let mut cumulative = 0.0;
    let mut above = f64::NEG_INFINITY;
    let mut below = f64::INFINITY;
    for (k, release) in annual.iter().enumerate() {
        cumulative += release;
        let excess = cumulative - (k + 1) as f64 * average;
        above = above.max(excess);
        below = below.min(excess);
    }

    let excursion = above.abs() + below.abs();
    if !(excursion > 0.0 && excursion.is_finite()) {
        return Err(Error::UndefinedStatistic(format!(
            "cumulative moment excursion is {} over {} years",
            excursion, span
        )));
    }
    Ok(moment_magnitude(excursion))
}

/// Bootstrap mean and standard deviation of [`cumulative_moment`].
///
/// Each replicate perturbs every magnitude by `sigma_i * N(0, 1)`. With a
/// `seed` the replicates are reproducible; without one the generator is
/// seeded from OS entropy.
pub fn cumulative_moment_bootstrap(
    years: &[i32],
    magnitudes: &[f64],
    sigmas: &[f64],
    replicates: usize,
    seed: Option<u64>,
) -> Result<(f64, f64)> {
    if magnitudes.len() != sigmas.len() {
        return Err(Error::length_mismatch(
            "cumulative moment magnitudes/sigmas",
            magnitudes.len(),
            sigmas.len(),
        ));
    }
    if replicates < 2 {
        return Err(Error::InsufficientData {
            what: "bootstrap replicates".to_string(),
            needed: 2,
            got: replicates,
        });
    }

    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    };

    let mut estimates = Vec::with_capacity(replicates);
    let mut sample = vec![0.0; magnitudes.len()];
    for replicate in 0..replicates {
        for ((out, &m), &sigma) in sample.iter_mut().zip(magnitudes).zip(sigmas) {
            let z: f64 = StandardNormal.sample(&mut rng);
            *out = m + sigma * z;
        }
        let estimate = cumulative_moment(years, &sample)?;
        trace!(replicate, estimate, "bootstrap replicate");
        estimates.push(estimate);
    }

    let (mmax, sigma) = (mean(&estimates), std_dev(&estimates, 1));
    debug!(replicates, mmax, sigma, seeded = seed.is_some(), "cumulative moment bootstrap");
    Ok((mmax, sigma))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moment_conversion_inverts() {
        for m in [4.0, 5.5, 7.2] {
            assert!((moment_magnitude(moment(m)) - m).abs() < 1e-12);
        }
    }

    #[test]
    fn single_large_event_dominates() {
        // One M7 in the middle of a quiet decade.
        let years: Vec<i32> = (2000..2010).collect();
        let mut mags = vec![4.0; 10];
        mags[5] = 7.0;
        let mmax = cumulative_moment(&years, &mags).unwrap();
        assert!((mmax - 6.969485850416527).abs() < 1e-9, "{mmax}");
    }

    #[test]
    fn single_year_is_undefined() {
        let err = cumulative_moment(&[2004, 2004, 2004], &[5.0, 5.5, 4.2]).unwrap_err();
        assert_eq!(err.code(), 30);
    }

    #[test]
    fn empty_catalog_fails() {
        assert_eq!(cumulative_moment(&[], &[]).unwrap_err().code(), 21);
    }

    #[test]
    fn extreme_year_span_is_rejected() {
        let err = cumulative_moment(&[i32::MIN, i32::MAX], &[5.0, 6.0]).unwrap_err();
        assert_eq!(err.code(), 23);
        let err = cumulative_moment(&[-200_000, 2000], &[5.0, 6.0]).unwrap_err();
        assert_eq!(err.code(), 23);
    }

    #[test]
    fn long_historical_span_is_accepted() {
        let mmax = cumulative_moment(&[-1000, 2000], &[6.0, 5.0]).unwrap();
        assert!(mmax.is_finite());
    }

    #[test]
    fn seeded_bootstrap_is_reproducible() {
        let years: Vec<i32> = (1990..2010).collect();
        let mags: Vec<f64> = (0..20).map(|k| 4.0 + 0.15 * (k % 7) as f64).collect();
        let sigmas = vec![0.1; 20];

        let a = cumulative_moment_bootstrap(&years, &mags, &sigmas, 50, Some(42)).unwrap();
        let b = cumulative_moment_bootstrap(&years, &mags, &sigmas, 50, Some(42)).unwrap();
        assert_eq!(a, b);
        assert!(a.1 > 0.0);

        let point = cumulative_moment(&years, &mags).unwrap();
        assert!((a.0 - point).abs() < 0.5);
    }

    #[test]
    fn zero_sigma_bootstrap_matches_point_estimate() {
        let years: Vec<i32> = (1990..2010).collect();
        let mags: Vec<f64> = (0..20).map(|k| 4.0 + 0.15 * (k % 7) as f64).collect();
        let (mmax, sigma) =
            cumulative_moment_bootstrap(&years, &mags, &vec![0.0; 20], 5, None).unwrap();
        assert!((mmax - cumulative_moment(&years, &mags).unwrap()).abs() < 1e-12);
        assert!(sigma.abs() < 1e-12);
    }
}
