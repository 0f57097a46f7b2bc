//! Weichert (1980) recurrence for catalogs with variable completeness.
//!
//! Each magnitude bin `j` has its own observation period `t_j`. With
//! `β = b ln 10` the log-likelihood of the binned counts `n_j` is
//! maximised by Newton-Raphson:
//!
//! ```text
//! dL/dβ   = N Σ t_j M_j e^(-β M_j) / Σ t_j e^(-β M_j) - Σ n_j M_j
//! d²L/dβ² = N [ (Σ t M e^(-βM) / Σ t e^(-βM))² - Σ t M² e^(-βM) / Σ t e^(-βM) ]
//! ```

use super::table::{max, min};
use super::RecurrenceResult;
use qk_common::{CompletenessTable, Error, Result};
use qk_config::RecurrenceConfig;
use qk_math::{arange, histogram_2d, round_to, Convergence};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Binned input of the Weichert estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeichertTable {
    /// Magnitude bin centres.
    pub centres: Vec<f64>,
    /// Observation period of each bin, years.
    pub periods: Vec<f64>,
    /// Events per bin inside its completeness window.
    pub counts: Vec<u64>,
}

/// Bin a catalog for [`weichert`].
///
/// Events are counted on a (year, magnitude) grid with magnitudes rounded to
/// one decimal. For each completeness row `(year, m)` the cells whose upper
/// time edge is before `year` and whose upper magnitude edge is below `m`
/// are cleared. A bin's observation period runs from the first
/// completeness year whose threshold is at or above the bin's lower edge to
/// the last catalog year.
pub fn weichert_prep(
    years: &[f64],
    magnitudes: &[f64],
    completeness: &CompletenessTable,
    dmag: f64,
    dtime: f64,
) -> Result<WeichertTable> {
    if years.len() != magnitudes.len() {
        return Err(Error::length_mismatch(
            "weichert years/magnitudes",
            years.len(),
            magnitudes.len(),
        ));
    }
    if years.is_empty() {
        return Err(Error::EmptyInput("weichert catalog".to_string()));
    }
    if completeness.is_empty() {
        return Err(Error::EmptyInput("completeness table".to_string()));
    }
    for (name, v) in [("magnitude bin width", dmag), ("time bin width", dtime)] {
        if !(v.is_finite() && v > 0.0) {
            return Err(Error::InvalidConfig(format!("{} must be positive, got {}", name, v)));
        }
    }

    let last_year = max(years);
    let time_edges = arange(min(years), last_year + 1.5 * dtime, dtime);
    let mags: Vec<f64> = magnitudes.iter().map(|&m| round_to(m, 1)).collect();
    let mag_edges = arange(min(&mags), max(&mags) + 1.5 * dmag, dmag);
    let mut grid = histogram_2d(years, &mags, &time_edges, &mag_edges);

    let ctime = completeness.years();
    let cmag = completeness.magnitudes();
    for (&cy, &cm) in ctime.iter().zip(&cmag) {
        let rows = time_edges.iter().filter(|&&t| t < cy).count();
        let cols = mag_edges.iter().filter(|&&m| m < cm).count();
        if rows == 0 || cols == 0 {
            continue;
        }
        for row in grid.iter_mut().take(rows - 1) {
            for cell in row.iter_mut().take(cols - 1) {
                *cell = 0;
            }
        }
    }

    let nbins = mag_edges.len().saturating_sub(1);
    let centres: Vec<f64> = mag_edges
        .windows(2)
        .map(|w| (w[0] + w[1]) / 2.0)
        .collect();
    let counts: Vec<u64> = (0..nbins)
        .map(|c| grid.iter().map(|row| row[c]).sum())
        .collect();
    let periods: Vec<f64> = mag_edges[..nbins]
        .iter()
        .map(|&lower| {
            let start = cmag
                .iter()
                .position(|&m| m >= lower)
                .map_or(ctime[ctime.len() - 1], |k| ctime[k]);
            last_year - start + 1.0
        })
        .collect();

    Ok(WeichertTable {
        centres,
        periods,
        counts,
    })
}

/// Fit b and the rate above `reference_magnitude` to a [`WeichertTable`].
///
/// Iterates from `initial_beta` until successive β differ by at most
/// `tolerance`, or `max_iterations` updates were made; in the latter case
/// the last iterate is returned with `converged = false`.
///
/// The a-value is the annual number of events at or above
/// `reference_magnitude`. A reference of `0` reports the annual rate above
/// the lowest bin edge, with its error extrapolated to magnitude zero.
pub fn weichert(table: &WeichertTable, config: &RecurrenceConfig) -> Result<RecurrenceResult> {
    let WeichertTable {
        centres,
        periods,
        counts,
    } = table;
    if centres.len() != periods.len() || centres.len() != counts.len() {
        return Err(Error::length_mismatch(
            "weichert bins",
            centres.len(),
            periods.len().min(counts.len()),
        ));
    }
    let nk: f64 = counts.iter().map(|&n| n as f64).sum();
    if nk == 0.0 {
        return Err(Error::UndefinedStatistic(
            "weichert b-value of zero events".to_string(),
        ));
    }

    let snm: f64 = counts.iter().zip(centres).map(|(&n, m)| n as f64 * m).sum();
    let lowest_edge = centres[0] - config.magnitude_window / 2.0;
    let ln10 = std::f64::consts::LN_10;

    let mut beta = config.initial_beta;
    let mut iterations = 0;
    loop {
        iterations += 1;
        let tjexp: Vec<f64> = periods
            .iter()
            .zip(centres)
            .map(|(t, m)| t * (-beta * m).exp())
            .collect();
        let tmexp: Vec<f64> = tjexp.iter().zip(centres).map(|(tj, m)| tj * m).collect();
        let sumexp: f64 = centres.iter().map(|m| (-beta * m).exp()).sum();
        let stmex: f64 = tmexp.iter().sum();
        let sumtex: f64 = tjexp.iter().sum();
        let stm2x: f64 = centres.iter().zip(&tmexp).map(|(m, tm)| m * tm).sum();

        let mean_m = stmex / sumtex;
        let d2ldb2 = nk * (mean_m * mean_m - stm2x / sumtex);
        let dldb = mean_m * nk - snm;
        let previous = beta;
        beta -= dldb / d2ldb2;
        if !beta.is_finite() {
            return Err(Error::NumericalInstability(format!(
                "weichert beta diverged after {} iterations",
                iterations
            )));
        }

        let done = (beta - previous).abs() <= config.tolerance;
        if done || iterations >= config.max_iterations {
            let convergence = if done {
                Convergence::converged(iterations)
            } else {
                warn!(
                    iterations,
                    delta = (beta - previous).abs(),
                    "weichert iteration cap reached"
                );
                Convergence::capped(iterations)
            };

            let sigma_beta = (-1.0 / d2ldb2).sqrt();
            let fngtm0 = nk * (sumexp / sumtex);
            let (a_value, sigma_a) = if config.reference_magnitude == 0.0 {
                let fn0 = fngtm0 * (-beta * lowest_edge).exp();
                (fngtm0, fn0 / nk.sqrt())
            } else {
                let a = fngtm0 * (-beta * (config.reference_magnitude - lowest_edge)).exp();
                (a, a / nk.sqrt())
            };
            debug!(iterations, beta, converged = done, "weichert fit complete");

            return Ok(RecurrenceResult {
                b_value: beta / ln10,
                sigma_b: sigma_beta / ln10,
                a_value,
                sigma_a,
                convergence: Some(convergence),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CompletenessTable {
        CompletenessTable::from_columns(&[2000.0, 1990.0], &[4.6, 5.0]).unwrap()
    }

    #[test]
    fn prep_clears_incomplete_cells() {
        let years = [1995.0, 2001.0, 1992.0, 2003.0, 1985.0, 1988.0];
        let mags = [4.0, 4.04, 5.1, 5.0, 5.2, 4.6];
        let prep = weichert_prep(&years, &mags, &table(), 0.5, 1.0).unwrap();

        assert_eq!(prep.centres, vec![4.25, 4.75, 5.25]);
        // the 1995 event of the lowest bin is cleared, 1988 M4.6 is kept
        assert_eq!(prep.counts, vec![1, 1, 3]);
        assert_eq!(prep.periods, vec![4.0, 4.0, 14.0]);
    }

    #[test]
    fn prep_requires_completeness_rows() {
        let err = weichert_prep(&[2000.0], &[4.0], &CompletenessTable::default(), 0.1, 1.0)
            .unwrap_err();
        assert_eq!(err.code(), 21);
    }

    #[test]
    fn iteration_cap_is_reported() {
        let table = WeichertTable {
            centres: vec![4.05, 4.15, 4.25, 4.35],
            periods: vec![40.0; 4],
            counts: vec![100, 80, 63, 50],
        };
        let config = RecurrenceConfig {
            max_iterations: 1,
            ..Default::default()
        };
        let capped = weichert(&table, &config).unwrap();
        assert_eq!(capped.convergence, Some(Convergence::capped(1)));
        assert!((capped.b_value - 1.0008372334647784).abs() < 1e-9);

        let fitted = weichert(&table, &RecurrenceConfig::default()).unwrap();
        assert_eq!(fitted.convergence, Some(Convergence::converged(3)));
        assert!((fitted.b_value - 1.0050784161759572).abs() < 1e-9);
        assert!((fitted.sigma_b - 0.23209741239593315).abs() < 1e-9);
        assert!((fitted.a_value - 7.325).abs() < 1e-9);
    }

    #[test]
    fn zero_counts_are_undefined() {
        let table = WeichertTable {
            centres: vec![4.05, 4.15],
            periods: vec![10.0, 10.0],
            counts: vec![0, 0],
        };
        let err = weichert(&table, &RecurrenceConfig::default()).unwrap_err();
        assert_eq!(err.code(), 30);
    }
}
