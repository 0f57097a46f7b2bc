//! Summary statistics over magnitude samples.

/// Arithmetic mean. Returns NaN for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with `ddof` delta degrees of freedom.
///
/// Returns NaN when `values.len() <= ddof`.
pub fn std_dev(values: &[f64], ddof: usize) -> f64 {
    let n = values.len();
    if n <= ddof {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (n - ddof) as f64).sqrt()
}

/// Sample quantile of ascending-sorted data with plotting positions
/// `(k - alpha) / (n + 1 - alpha - beta)`.
///
/// Returns NaN for empty input or `p` outside `[0, 1]`.
pub fn plotting_position_quantile(sorted: &[f64], p: f64, alpha: f64, beta: f64) -> f64 {
    let n = sorted.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }
    let m = alpha + p * (1.0 - alpha - beta);
    let aleph = n as f64 * p + m;
    let k = aleph.clamp(1.0, (n - 1) as f64).floor();
    let gamma = (aleph - k).clamp(0.0, 1.0);
    let k = k as usize;
    (1.0 - gamma) * sorted[k - 1] + gamma * sorted[k]
}

/// Approximately median-unbiased quantile (Cunnane, alpha = beta = 0.4).
pub fn cunnane_quantile(sorted: &[f64], p: f64) -> f64 {
    plotting_position_quantile(sorted, p, 0.4, 0.4)
}

/// Consecutive slopes `(y[k+1] - y[k]) / (x[k+1] - x[k])`.
///
/// Output has one fewer element than the shorter input.
pub fn consecutive_slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len().min(y.len());
    (0..n.saturating_sub(1))
        .map(|k| (y[k + 1] - y[k]) / (x[k + 1] - x[k]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(mean(&v), 2.5);
        assert!((std_dev(&v, 0) - 1.118033988749895).abs() < 1e-12);
        assert!((std_dev(&v, 1) - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn empty_statistics_are_nan() {
        assert!(mean(&[]).is_nan());
        assert!(std_dev(&[1.0], 1).is_nan());
        assert!(cunnane_quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn cunnane_quantiles_interpolate() {
        let v: Vec<f64> = (1..=10).map(|k| k as f64).collect();
        // aleph = 10 * 0.25 + 0.4 + 0.25 * 0.2 = 2.95
        assert!((cunnane_quantile(&v, 0.25) - 2.95).abs() < 1e-12);
        assert!((cunnane_quantile(&v, 0.75) - 8.05).abs() < 1e-12);
    }

    #[test]
    fn quantile_clamps_at_extremes() {
        let v = [1.0, 2.0, 3.0];
        assert_eq!(cunnane_quantile(&v, 0.0), 1.0);
        assert_eq!(cunnane_quantile(&v, 1.0), 3.0);
    }

    #[test]
    fn slopes() {
        let s = consecutive_slopes(&[0.0, 1.0, 3.0], &[0.0, 2.0, 3.0]);
        assert_eq!(s, vec![2.0, 0.5]);
        assert!(consecutive_slopes(&[1.0], &[1.0]).is_empty());
    }
}
