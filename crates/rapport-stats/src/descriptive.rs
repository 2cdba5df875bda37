use serde::{Deserialize, Serialize};

/// Descriptive statistics summarizing one feature column.
///
/// Variance is the population variance (divided by `N`, not `N - 1`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    /// Number of samples.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// `max - min`.
    pub range: f64,
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// The population variance of the dataset.
    pub variance: f64,
    /// The standard deviation of the dataset (`variance.sqrt()`).
    pub std_dev: f64,
    /// `std_dev / |mean|`, or `0.0` when the mean is zero.
    pub coefficient_of_variation: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// This method will sort the values internally before computing statistics.
    /// NaN values are skipped.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one non-NaN value
    /// * `None` - otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// # use rapport_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.variance, 2.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// Use this when you already have sorted data to avoid unnecessary work.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order. A NaN anywhere
    /// in the slice counts as unsorted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rapport_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::from_sorted(&[0.0, 0.0, 0.0]).unwrap();
    /// assert_eq!(stats.coefficient_of_variation, 0.0);
    /// assert!(DescriptiveStats::from_sorted(&[]).is_none());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let sum = sorted_values.iter().sum::<f64>();
        let mean = if sum.is_finite() {
            sum / n
        } else {
            // the sum of large values overflows even when their mean does not
            sorted_values
                .iter()
                .enumerate()
                .fold(0.0_f64, |mean, (i, v)| mean + (v - mean) / (i + 1) as f64)
        };
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();
        let coefficient_of_variation = if mean == 0.0 {
            0.0
        } else if std_dev.is_finite() {
            std_dev / mean.abs()
        } else {
            // deviations scaled by the mean stay representable
            let scale = mean.abs();
            (sorted_values
                .iter()
                .map(|v| ((v - mean) / scale).powi(2))
                .sum::<f64>()
                / n)
                .sqrt()
        };

        Some(Self {
            count,
            min,
            max,
            range: max - min,
            mean,
            variance,
            std_dev,
            coefficient_of_variation,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_distr::{Distribution as _, Normal};
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_population_variance() {
        // population variance of [2, 4, 4, 4, 5, 5, 7, 9] is exactly 4
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.count, 8);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.variance, 4.0);
        assert_eq!(stats.std_dev, 2.0);
        assert_eq!(stats.coefficient_of_variation, 0.4);
        assert_eq!(stats.range, 7.0);
    }

    #[test]
    fn test_negative_mean_uses_absolute_value() {
        let stats = DescriptiveStats::new([-1.0, -3.0]).unwrap();
        assert_eq!(stats.mean, -2.0);
        assert_eq!(stats.coefficient_of_variation, 0.5);
    }

    #[test]
    fn test_zero_mean_has_zero_cv() {
        let stats = DescriptiveStats::new([-1.0, 1.0]).unwrap();
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.std_dev, 1.0);
        assert_eq!(stats.coefficient_of_variation, 0.0);
    }

    #[test]
    fn test_empty() {
        assert!(DescriptiveStats::new(std::iter::empty()).is_none());
    }

    #[test]
    #[should_panic(expected = "values must be sorted in ascending order")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = DescriptiveStats::from_sorted(&[3.0, 1.0]);
    }

    #[test]
    fn test_large_values_keep_finite_mean_and_cv() {
        let stats = DescriptiveStats::new([1e308, 1.5e308, 1.7e308]).unwrap();
        assert!(stats.mean.is_finite());
        assert!((stats.mean / 1.4e308 - 1.0).abs() < 1e-12);
        // the variance itself is beyond f64 range
        assert_eq!(stats.variance, f64::INFINITY);
        assert_eq!(stats.std_dev, stats.variance.sqrt());
        let expected_cv = (0.26_f64 / 3.0).sqrt() / 1.4;
        assert!((stats.coefficient_of_variation - expected_cv).abs() < 1e-9);
    }

    #[test]
    fn test_nan_values_are_skipped() {
        let stats = DescriptiveStats::new([f64::NAN, 1.0, 3.0]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 2.0);
        assert!(DescriptiveStats::new([f64::NAN]).is_none());
    }

    #[test]
    #[should_panic(expected = "values must be sorted in ascending order")]
    fn test_from_sorted_rejects_nan() {
        let _ = DescriptiveStats::from_sorted(&[1.0, f64::NAN]);
    }

    #[test]
    fn test_variance_non_negative_and_std_dev_is_sqrt() {
        let mut rng = Pcg32::seed_from_u64(0x5eed);
        let normal = Normal::new(50.0, 20.0).unwrap();
        for _ in 0..200 {
            let len = rng.random_range(1..40);
            let values = (0..len).map(|_| normal.sample(&mut rng)).collect::<Vec<f64>>();
            let stats = DescriptiveStats::new(values).unwrap();
            assert!(stats.variance >= 0.0);
            assert_eq!(stats.std_dev, stats.variance.sqrt());
        }
    }
}
