use serde::{Deserialize, Serialize};

/// Quartiles of a dataset computed with nearest-rank indexing.
///
/// # Examples
///
/// ```
/// use rapport_stats::percentiles::Quartiles;
///
/// let quartiles = Quartiles::new(&[40.0, 10.0, 30.0, 20.0]);
/// assert_eq!(quartiles.q1, 20.0);
/// assert_eq!(quartiles.median, 30.0);
/// assert_eq!(quartiles.q3, 40.0);
/// assert_eq!(quartiles.iqr(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    /// Value at index `floor(N * 0.25)`.
    pub q1: f64,
    /// Value at index `floor(N * 0.5)`.
    pub median: f64,
    /// Value at index `floor(N * 0.75)`.
    pub q3: f64,
}

impl Quartiles {
    /// Computes quartiles from unsorted values.
    ///
    /// NaN values are skipped. Returns NaN quartiles when nothing is left.
    #[must_use]
    pub fn new(values: &[f64]) -> Self {
        let mut sorted = values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    /// Computes quartiles from sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order. A NaN anywhere
    /// in the slice counts as unsorted.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );
        Self {
            q1: compute_percentile(sorted_values, 25.0),
            median: compute_percentile(sorted_values, 50.0),
            q3: compute_percentile(sorted_values, 75.0),
        }
    }

    /// Interquartile range (`q3 - q1`).
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Computes a single percentile value from sorted data.
///
/// This function uses the nearest-rank method without interpolation.
/// For a dataset with n values, the k-th percentile is the value at position
/// `floor(n * k / 100)`, clamped to the last element.
///
/// Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use rapport_stats::percentiles::compute_percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_percentile(&values, 50.0), 3.0);
/// assert_eq!(compute_percentile(&values, 25.0), 2.0);
/// assert_eq!(compute_percentile(&values, 100.0), 5.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let idx = ((sorted_values.len() as f64 * percentile) / 100.0) as usize;
    let idx = idx.min(sorted_values.len() - 1);
    sorted_values[idx]
}
