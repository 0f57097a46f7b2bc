//! Stepp (1971) completeness analysis.
//!
//! For trailing time windows of length `dt, 2dt, ...` ending at the last
//! catalog year, the events of each magnitude bin give a rate `λ = n / T`
//! and a Poisson standard error `σ = sqrt(λ / T)`. While the catalog is
//! complete for a bin, `log σ` falls against `log T` with slope `-1/2`.
//! The completeness point of a bin is the last window where the change in
//! slope residual exceeds the sensitivity. A break at the first residual
//! only is not taken as a completeness point.

use qk_common::{CompletenessRow, CompletenessTable, Error, Result};
use qk_config::CompletenessConfig;
use qk_math::{arange, ceil_tenth, consecutive_slopes, floor_tenth, round_to};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// Lower bound on the Poisson standard error, keeps `log10` finite for empty bins.
const SIGMA_FLOOR: f64 = 1e-14;

/// Stepp parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteppParams {
    /// Magnitude bin width.
    pub magnitude_bin: f64,
    /// Time window increment, years.
    pub time_bin: f64,
    /// Tolerance on consecutive slope residuals.
    pub sensitivity: f64,
    /// Completeness years may not increase with magnitude.
    pub increasing_only: bool,
}

impl Default for SteppParams {
    fn default() -> Self {
        Self::from(&CompletenessConfig::default())
    }
}

impl From<&CompletenessConfig> for SteppParams {
    fn from(config: &CompletenessConfig) -> Self {
        Self {
            magnitude_bin: config.magnitude_window,
            time_bin: config.time_window,
            sensitivity: config.sensitivity,
            increasing_only: config.increment_lock,
        }
    }
}

impl SteppParams {
    fn check(&self) -> Result<()> {
        for (name, v) in [
            ("magnitude_bin", self.magnitude_bin),
            ("time_bin", self.time_bin),
            ("sensitivity", self.sensitivity),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "stepp {} must be positive, got {}",
                    name, v
                )));
            }
        }
        Ok(())
    }
}

/// Completeness table for events with the given years and magnitudes.
///
/// Rows are ordered by increasing magnitude bin. An empty catalog yields
/// an empty table.
pub fn stepp(years: &[f64], magnitudes: &[f64], params: &SteppParams) -> Result<CompletenessTable> {
    params.check()?;
    if years.len() != magnitudes.len() {
        return Err(Error::length_mismatch(
            "stepp years/magnitudes",
            years.len(),
            magnitudes.len(),
        ));
    }
    if years.iter().chain(magnitudes).any(|v| !v.is_finite()) {
        return Err(Error::InvalidInput(
            "stepp input contains non-finite values".to_string(),
        ));
    }
    if years.is_empty() {
        return Ok(CompletenessTable::default());
    }

    let mags: Vec<f64> = magnitudes.iter().map(|&m| round_to(m, 2)).collect();
    let low = floor_tenth(mags.iter().copied().fold(f64::INFINITY, f64::min));
    let high = ceil_tenth(mags.iter().copied().fold(f64::NEG_INFINITY, f64::max));
    let mbins = arange(low, high + params.magnitude_bin, params.magnitude_bin);
    if mbins.len() < 2 {
        warn!(low, high, "magnitude range too narrow for completeness bins");
        return Ok(CompletenessTable::default());
    }
    let nbins = mbins.len() - 1;

    let end = years.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let start = years.iter().copied().fold(f64::INFINITY, f64::min);
    let windows = arange(params.time_bin, end - start + 2.0, params.time_bin);
    if windows.is_empty() {
        return Err(Error::InsufficientData {
            what: "stepp time windows".to_string(),
            needed: 1,
            got: 0,
        });
    }

    // counts[w][b]: events of bin b inside trailing window w
    let mut counts = vec![vec![0u64; nbins]; windows.len()];
    for (&year, &m) in years.iter().zip(&mags) {
        let Some(bin) = magnitude_bin(&mbins[..nbins], m) else {
            continue;
        };
        for (w, &length) in windows.iter().enumerate() {
            if year >= end - length {
                counts[w][bin] += 1;
            }
        }
    }

    let log_t: Vec<f64> = windows.iter().map(|t| t.log10()).collect();
    let log_poisson: Vec<f64> = windows.iter().map(|t| (1.0 / t.sqrt()).log10()).collect();
    let poisson_slope = consecutive_slopes(&log_t, &log_poisson);

    let mut location = vec![0usize; nbins];
    for b in 0..nbins {
        let log_sigma: Vec<f64> = windows
            .iter()
            .zip(&counts)
            .map(|(&t, row)| {
                let rate = row[b] as f64 / t;
                (rate / t).sqrt().max(SIGMA_FLOOR).log10()
            })
            .collect();
        let residual: Vec<f64> = consecutive_slopes(&log_t, &log_sigma)
            .iter()
            .zip(&poisson_slope)
            .map(|(g, p)| g - p)
            .collect();
        let last_break = residual
            .windows(2)
            .rposition(|r| (r[1] - r[0]).abs() > params.sensitivity)
            .filter(|&k| k > 0);

        location[b] = match last_break {
            Some(k) => k,
            None if b == 0 => {
                error!(
                    magnitude = mbins[0],
                    sensitivity = params.sensitivity,
                    "no completeness point for the lowest magnitude bin; revise catalog or tolerance"
                );
                0
            }
            None => location[b - 1],
        };
        if b > 0 && params.increasing_only && location[b] < location[b - 1] {
            location[b] = location[b - 1];
        }
    }

    let rows: Vec<CompletenessRow> = location
        .iter()
        .zip(&mbins)
        .map(|(&k, &magnitude)| CompletenessRow {
            year: end - windows[k],
            magnitude,
        })
        .collect();

    debug!(
        events = years.len(),
        bins = nbins,
        windows = windows.len(),
        "stepp completeness table built"
    );
    Ok(CompletenessTable::new(rows))
}

/// Bin of `m` among lower edges `lower`; the last bin is open above.
fn magnitude_bin(lower: &[f64], m: f64) -> Option<usize> {
    let last = lower.len().checked_sub(1)?;
    if m < lower[0] {
        return None;
    }
    if m >= lower[last] {
        return Some(last);
    }
    Some(lower.partition_point(|&e| e <= m) - 1)
}
