//! Maximum-likelihood b-value (Aki 1965 with Bender's standard error).

use super::table::recurrence_table;
use super::RecurrenceResult;
use qk_common::{CompletenessTable, Error, Result};
use tracing::debug;

/// Completeness years closer than this are one sub-period.
const YEAR_TOLERANCE: f64 = 1e-5;

/// b-value and its standard error from binned magnitudes.
///
/// Only bins with centre `>= m_c` are used:
///
/// ```text
/// b   = log10(e) / (mean(M) - min(M) + dmag/2)
/// σ_b = 2.3 b² sqrt(Σ n (M - mean)² / (N (N - 1)))
/// ```
pub fn b_max_likelihood(centres: &[f64], counts: &[u64], dmag: f64, m_c: f64) -> Result<(f64, f64)> {
    if centres.len() != counts.len() {
        return Err(Error::length_mismatch(
            "b-value bins/counts",
            centres.len(),
            counts.len(),
        ));
    }
    let selected: Vec<(f64, f64)> = centres
        .iter()
        .zip(counts)
        .filter(|(&m, _)| m >= m_c)
        .map(|(&m, &n)| (m, n as f64))
        .collect();

    let neq: f64 = selected.iter().map(|(_, n)| n).sum();
    if neq == 0.0 {
        return Err(Error::UndefinedStatistic(format!(
            "b-value of zero events above magnitude {}",
            m_c
        )));
    }
    if neq < 2.0 {
        return Err(Error::InsufficientData {
            what: "b-value standard error".to_string(),
            needed: 2,
            got: neq as usize,
        });
    }

    let m_min = selected.iter().map(|(m, _)| *m).fold(f64::INFINITY, f64::min);
    let m_ave = selected.iter().map(|(m, n)| m * n).sum::<f64>() / neq;
    let b = std::f64::consts::E.log10() / (m_ave - m_min + dmag / 2.0);
    let spread = selected
        .iter()
        .map(|(m, n)| n * (m - m_ave).powi(2))
        .sum::<f64>()
        / (neq * (neq - 1.0));
    Ok((b, 2.3 * b * b * spread.sqrt()))
}

/// MLE fit per completeness sub-period, averaged with event-count weights.
///
/// Each distinct completeness year starts a sub-period containing the events
/// from that year on with magnitude at or above the smallest threshold
/// sharing the year. The a-value is referenced to `reference_magnitude`.
pub fn b_maxlike_time(
    years: &[f64],
    magnitudes: &[f64],
    completeness: &CompletenessTable,
    dmag: f64,
    reference_magnitude: f64,
) -> Result<RecurrenceResult> {
    if years.len() != magnitudes.len() {
        return Err(Error::length_mismatch(
            "recurrence years/magnitudes",
            years.len(),
            magnitudes.len(),
        ));
    }
    if completeness.is_empty() {
        return Err(Error::EmptyInput("completeness table".to_string()));
    }

    let ctime = completeness.years();
    let cmag = completeness.magnitudes();
    let mut fits: Vec<(f64, [f64; 4])> = Vec::new();

    let mut ival = 0;
    while ival < ctime.len() {
        let group: Vec<usize> = (0..ctime.len())
            .filter(|&k| (ctime[k] - ctime[ival]).abs() < YEAR_TOLERANCE)
            .collect();
        let m_c = group.iter().map(|&k| cmag[k]).fold(f64::INFINITY, f64::min);

        let (sel_years, sel_mags): (Vec<f64>, Vec<f64>) = years
            .iter()
            .zip(magnitudes)
            .filter(|(&y, &m)| y >= ctime[ival] && m >= m_c)
            .map(|(&y, &m)| (y, m))
            .unzip();
        if sel_mags.is_empty() {
            return Err(Error::UndefinedStatistic(format!(
                "b-value of zero events since {} above magnitude {}",
                ctime[ival], m_c
            )));
        }

        let rows = recurrence_table(&sel_mags, &sel_years, dmag)?;
        let centres: Vec<f64> = rows.iter().map(|r| r.magnitude).collect();
        let counts: Vec<u64> = rows.iter().map(|r| r.count).collect();
        let (b, sigma_b) = b_max_likelihood(&centres, &counts, dmag, m_c)?;

        let log_n = (sel_mags.len() as f64).log10();
        let a = log_n + b * reference_magnitude;
        let sigma_a = (log_n + (b + sigma_b) * reference_magnitude - a).abs();
        debug!(
            start_year = ctime[ival],
            m_c,
            events = sel_mags.len(),
            b,
            "sub-period MLE fit"
        );
        fits.push((sel_mags.len() as f64, [b, sigma_b, a, sigma_a]));

        ival += group.len();
    }

    let total: f64 = fits.iter().map(|(n, _)| n).sum();
    let mut averaged = [0.0; 4];
    for (n, params) in &fits {
        let w = n / total;
        for (acc, p) in averaged.iter_mut().zip(params) {
            *acc += w * p;
        }
    }

    Ok(RecurrenceResult {
        b_value: averaged[0],
        sigma_b: averaged[1],
        a_value: averaged[2],
        sigma_a: averaged[3],
        convergence: None,
    })
}
