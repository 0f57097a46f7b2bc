//! Sample grids and quadrature over non-uniform abscissae.

/// `n` points between `lower` and `upper` spaced uniformly in `exp(x)`.
///
/// Points crowd towards `upper`. The last point is exactly `upper`. Returns
/// an empty vector for `n == 0` and `[upper]` for `n == 1`.
pub fn exp_spaced(lower: f64, upper: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![upper],
        _ => {
            let el = lower.exp();
            let eu = upper.exp();
            let step = (eu - el) / (n as f64 - 1.0);
            let mut points: Vec<f64> = (0..n - 1).map(|k| (el + k as f64 * step).ln()).collect();
            points.push(eu.ln());
            points
        }
    }
}

/// Trapezoidal integral of `y` over sorted, possibly uneven abscissae `x`.
///
/// Written as a weighted sum `Σ w_i y_i` with `w_i = (x_{i+1} - x_{i-1}) / 2`
/// in the interior and half-intervals at both ends. Returns 0 for fewer than
/// two points.
pub fn nonuniform_trapezoid(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let mut total = 0.5 * y[0] * (x[1] - x[0]);
    for i in 1..n - 1 {
        total += 0.5 * y[i] * (x[i + 1] - x[i - 1]);
    }
    total + 0.5 * y[n - 1] * (x[n - 1] - x[n - 2])
}
