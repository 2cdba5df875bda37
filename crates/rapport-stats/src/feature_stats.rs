use serde::{Deserialize, Serialize};

use crate::{descriptive::DescriptiveStats, entropy, percentiles::Quartiles};

/// Complete statistical profile of one feature key.
///
/// Combines:
/// - descriptive statistics (mean, variance, coefficient of variation, ...)
/// - nearest-rank quartiles and the interquartile range
/// - distinct value count and normalized entropy
/// - data coverage across all entities, including those without a value
///
/// # Examples
///
/// ```
/// use rapport_stats::feature_stats::FeatureStats;
///
/// // three of four entities provide a value
/// let stats = FeatureStats::from_samples(&[10.0, 50.0, 90.0], 4).unwrap();
/// assert_eq!(stats.descriptive.mean, 50.0);
/// assert_eq!(stats.quartiles.median, 50.0);
/// assert_eq!(stats.distinct_values, 3);
/// assert_eq!(stats.coverage, 0.75);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    #[serde(flatten)]
    pub descriptive: DescriptiveStats,
    pub distinct_values: usize,
    /// Normalized entropy in `[0, 1]`.
    pub entropy: f64,
    pub quartiles: Quartiles,
    pub iqr: f64,
    /// Fraction of entities with a usable value, in `[0, 1]`.
    pub coverage: f64,
}

impl FeatureStats {
    /// Computes the profile of `samples` drawn from `total_entities` entities.
    ///
    /// NaN samples are skipped and count against coverage. Returns `None` when no
    /// sample is left. `total_entities` smaller than the sample count is treated
    /// as the sample count.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_samples(samples: &[f64], total_entities: usize) -> Option<Self> {
        let mut sorted = samples
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);

        let descriptive = DescriptiveStats::from_sorted(&sorted)?;
        let quartiles = Quartiles::from_sorted(&sorted);
        let total_entities = total_entities.max(sorted.len());

        Some(Self {
            descriptive,
            distinct_values: entropy::distinct_count(&sorted),
            entropy: entropy::normalized_entropy(&sorted),
            iqr: quartiles.iqr(),
            quartiles,
            coverage: sorted.len() as f64 / total_entities as f64,
        })
    }

    /// Whether every sample has the same value.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.distinct_values == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_samples_count_against_coverage() {
        let stats = FeatureStats::from_samples(&[1.0, f64::NAN, 3.0, 5.0], 4).unwrap();
        assert_eq!(stats.descriptive.count, 3);
        assert_eq!(stats.coverage, 0.75);
        assert!(FeatureStats::from_samples(&[f64::NAN], 1).is_none());
    }

    #[test]
    fn test_constant_feature() {
        let stats = FeatureStats::from_samples(&[1.0, 1.0, 1.0], 3).unwrap();
        assert!(stats.is_constant());
        assert_eq!(stats.entropy, 0.0);
        assert_eq!(stats.descriptive.variance, 0.0);
        assert_eq!(stats.coverage, 1.0);
    }

    #[test]
    fn test_coverage_is_bounded() {
        let stats = FeatureStats::from_samples(&[1.0, 2.0], 1).unwrap();
        assert_eq!(stats.coverage, 1.0);
    }

    #[test]
    fn test_empty() {
        assert!(FeatureStats::from_samples(&[], 10).is_none());
    }

    #[test]
    fn test_unsorted_input_is_sorted_internally() {
        let stats = FeatureStats::from_samples(&[9.0, 1.0, 5.0, 3.0], 4).unwrap();
        assert_eq!(stats.descriptive.min, 1.0);
        assert_eq!(stats.descriptive.max, 9.0);
        assert_eq!(stats.quartiles.q1, 3.0);
        assert_eq!(stats.quartiles.q3, 9.0);
        assert_eq!(stats.iqr, 6.0);
    }
}
