//! Evenly spaced grids, histogram binning and rounding.
//!
//! The grid helpers follow the half-open conventions used throughout catalog
//! statistics: a grid built with [`arange`] never contains `stop`, and
//! histogram bins are `[edge_k, edge_{k+1})` except the last, which is closed.

/// Evenly spaced values `start + k * step` for `k` in `0..ceil((stop - start) / step)`.
///
/// Returns an empty vector when the interval is empty, when `step` is not
/// positive, or when any argument is not finite.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(start.is_finite() && stop.is_finite() && step.is_finite()) || step <= 0.0 {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil();
    if n <= 0.0 {
        return Vec::new();
    }
    (0..n as usize).map(|k| start + k as f64 * step).collect()
}

/// Index of the histogram bin containing `x`.
///
/// `edges` must be sorted ascending. Bins are half-open except the last one,
/// which includes its upper edge. Returns `None` for values outside the
/// edges, for NaN, and when fewer than two edges are given.
pub fn histogram_bin(edges: &[f64], x: f64) -> Option<usize> {
    let n = edges.len();
    if n < 2 || x.is_nan() || x < edges[0] || x > edges[n - 1] {
        return None;
    }
    if x == edges[n - 1] {
        return Some(n - 2);
    }
    // Number of edges <= x, minus one.
    let upper = edges.partition_point(|&e| e <= x);
    Some(upper - 1)
}

/// Counts of `values` per histogram bin defined by `edges`.
pub fn histogram(values: &[f64], edges: &[f64]) -> Vec<u64> {
    let mut counts = vec![0u64; edges.len().saturating_sub(1)];
    for &v in values {
        if let Some(bin) = histogram_bin(edges, v) {
            counts[bin] += 1;
        }
    }
    counts
}

/// Counts over a two-dimensional grid of `(row, col)` histogram bins.
///
/// Returns a row-major matrix with `row_edges.len() - 1` rows.
pub fn histogram_2d(
    rows: &[f64],
    cols: &[f64],
    row_edges: &[f64],
    col_edges: &[f64],
) -> Vec<Vec<u64>> {
    let nr = row_edges.len().saturating_sub(1);
    let nc = col_edges.len().saturating_sub(1);
    let mut counts = vec![vec![0u64; nc]; nr];
    for (&r, &c) in rows.iter().zip(cols) {
        if let (Some(i), Some(j)) = (histogram_bin(row_edges, r), histogram_bin(col_edges, c)) {
            counts[i][j] += 1;
        }
    }
    counts
}

/// Round half to even (banker's rounding).
pub fn round_half_even(x: f64) -> f64 {
    x.round_ties_even()
}

/// Round `x` to `decimals` decimal places using half-to-even ties.
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    round_half_even(x * scale) / scale
}

/// Round down to the nearest tenth.
pub fn floor_tenth(x: f64) -> f64 {
    (10.0 * x).floor() / 10.0
}

/// Round up to the nearest tenth.
pub fn ceil_tenth(x: f64) -> f64 {
    (10.0 * x).ceil() / 10.0
}
