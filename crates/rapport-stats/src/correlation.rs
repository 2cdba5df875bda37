/// Pearson correlation coefficient of two equally long samples.
///
/// Computed as covariance over the product of standard deviations. Returns
/// `0.0` when the lengths differ, fewer than two pairs exist, or either side
/// has zero variance.
///
/// # Examples
///
/// ```
/// use rapport_stats::correlation::pearson;
///
/// let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert!((pearson(&xs, &xs) - 1.0).abs() < 1e-12);
/// assert!((pearson(&xs, &[5.0, 4.0, 3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
/// assert_eq!(pearson(&xs, &[2.0; 5]), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    (covariance / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}
