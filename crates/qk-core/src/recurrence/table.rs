//! Magnitude-frequency tables.

use qk_common::{Error, Result};
use qk_math::{arange, ceil_tenth, floor_tenth, histogram};
use serde::{Deserialize, Serialize};

/// One magnitude bin of a recurrence table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRow {
    /// Bin centre.
    pub magnitude: f64,
    /// Events in the bin.
    pub count: u64,
    /// Events in this bin or above.
    pub cumulative: u64,
    pub annual_rate: f64,
    pub cumulative_annual_rate: f64,
}

/// Incremental and cumulative counts per magnitude bin of width `dmag`.
///
/// Bins start at the smallest magnitude rounded down to a tenth and extend
/// one bin past the largest magnitude rounded up. Rates are per year of
/// the span `max(year) - min(year) + 1`.
pub fn recurrence_table(magnitudes: &[f64], years: &[f64], dmag: f64) -> Result<Vec<RecurrenceRow>> {
    if magnitudes.len() != years.len() {
        return Err(Error::length_mismatch(
            "recurrence table magnitudes/years",
            magnitudes.len(),
            years.len(),
        ));
    }
    if magnitudes.is_empty() {
        return Err(Error::EmptyInput("recurrence table".to_string()));
    }
    if !(dmag.is_finite() && dmag > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "magnitude bin width must be positive, got {}",
            dmag
        )));
    }

    let span = max(years) - min(years) + 1.0;
    let upper = magnitudes.iter().copied().map(ceil_tenth).fold(f64::NEG_INFINITY, f64::max);
    let lower = magnitudes.iter().copied().map(floor_tenth).fold(f64::INFINITY, f64::min);
    let edges = arange(lower, upper + 2.0 * dmag, dmag);
    let counts = histogram(magnitudes, &edges);

    let mut cumulative = vec![0u64; counts.len()];
    let mut running = 0u64;
    for (slot, &c) in cumulative.iter_mut().zip(&counts).rev() {
        running += c;
        *slot = running;
    }

    Ok(edges
        .iter()
        .zip(counts.iter().zip(&cumulative))
        .map(|(&edge, (&count, &cum))| RecurrenceRow {
            magnitude: edge + dmag / 2.0,
            count,
            cumulative: cum,
            annual_rate: count as f64 / span,
            cumulative_annual_rate: cum as f64 / span,
        })
        .collect())
}

pub(crate) fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

pub(crate) fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}
