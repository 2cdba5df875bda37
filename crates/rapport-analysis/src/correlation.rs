//! Pairwise correlation between significant features
//!
//! For every unordered pair of significant keys, only entities providing both
//! values take part (pairwise-complete observations). Weak pairs and pairs with
//! too few observations are skipped silently.

use rapport_stats::correlation::pearson;
use serde::{Deserialize, Serialize};

use crate::feature::FeatureVector;

/// Thresholds for correlation reporting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Pairs with fewer complete observations are skipped
    pub min_observations: usize,
    /// Pairs with `|r|` at or below this are not reported
    pub medium_threshold: f64,
    /// Pairs with `|r|` above this are labelled strong
    pub strong_threshold: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            min_observations: 5,
            medium_threshold: 0.5,
            strong_threshold: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    #[display("medium")]
    Medium,
    #[display("strong")]
    Strong,
}

/// A reported correlation between two features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub feature_a: String,
    pub feature_b: String,
    /// Pearson coefficient in `[-1, 1]`
    pub coefficient: f64,
    pub strength: CorrelationStrength,
    /// Number of pairwise-complete observations
    pub observations: usize,
}

/// Finds correlated pairs among `significant_keys`.
///
/// Pairs are formed in the order of `significant_keys` and the result is sorted by
/// `|r|` descending; equal magnitudes keep pair order.
///
/// # Examples
///
/// ```
/// use rapport_analysis::{
///     correlation::{CorrelationConfig, CorrelationStrength, find_correlations},
///     feature::FeatureVector,
/// };
///
/// let vectors = (0..6)
///     .map(|i| {
///         let i = f64::from(i);
///         FeatureVector::new(format!("c{i}"))
///             .with("meetings", i)
///             .with("memos", 2.0 * i + 1.0)
///     })
///     .collect::<Vec<_>>();
///
/// let pairs = find_correlations(&vectors, &["meetings", "memos"], &CorrelationConfig::default());
/// assert_eq!(pairs.len(), 1);
/// assert_eq!(pairs[0].strength, CorrelationStrength::Strong);
/// ```
#[must_use]
pub fn find_correlations<S>(
    vectors: &[FeatureVector],
    significant_keys: &[S],
    config: &CorrelationConfig,
) -> Vec<CorrelationPair>
where
    S: AsRef<str>,
{
    let mut pairs = vec![];

    for (i, key_a) in significant_keys.iter().enumerate() {
        for key_b in &significant_keys[i + 1..] {
            let (key_a, key_b) = (key_a.as_ref(), key_b.as_ref());
            let (xs, ys): (Vec<f64>, Vec<f64>) = vectors
                .iter()
                .filter_map(|vector| Some((vector.value(key_a)?, vector.value(key_b)?)))
                .unzip();

            if xs.len() < config.min_observations {
                tracing::debug!(
                    feature_a = key_a,
                    feature_b = key_b,
                    observations = xs.len(),
                    "skipping correlation with too few observations"
                );
                continue;
            }

            let coefficient = pearson(&xs, &ys);
            let magnitude = coefficient.abs();
            if magnitude <= config.medium_threshold {
                continue;
            }
            let strength = if magnitude > config.strong_threshold {
                CorrelationStrength::Strong
            } else {
                CorrelationStrength::Medium
            };
            pairs.push(CorrelationPair {
                feature_a: key_a.to_owned(),
                feature_b: key_b.to_owned(),
                coefficient,
                strength,
                observations: xs.len(),
            });
        }
    }

    pairs.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));
    tracing::info!(pairs = pairs.len(), "correlation analysis finished");
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectors(rows: &[(f64, f64, f64)]) -> Vec<FeatureVector> {
        rows.iter()
            .enumerate()
            .map(|(i, &(a, b, c))| {
                FeatureVector::new(format!("e{i}"))
                    .with("a", a)
                    .with("b", b)
                    .with("c", c)
            })
            .collect()
    }

    #[test]
    fn test_self_correlation_is_one() {
        let data = vectors(&[
            (1.0, 0.0, 0.0),
            (3.0, 0.0, 0.0),
            (2.0, 0.0, 0.0),
            (8.0, 0.0, 0.0),
            (5.0, 0.0, 0.0),
        ]);
        let pairs = find_correlations(&data, &["a", "a"], &CorrelationConfig::default());
        assert_eq!(pairs.len(), 1);
        assert!((pairs[0].coefficient - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_too_few_observations_skipped() {
        let data = vectors(&[
            (1.0, 1.0, 0.0),
            (2.0, 2.0, 0.0),
            (3.0, 3.0, 0.0),
            (4.0, 4.0, 0.0),
        ]);
        assert!(find_correlations(&data, &["a", "b"], &CorrelationConfig::default()).is_empty());
    }

    #[test]
    fn test_pairwise_complete_observations() {
        let mut data = vectors(&[
            (1.0, 2.0, 0.0),
            (2.0, 4.0, 0.0),
            (3.0, 6.0, 0.0),
            (4.0, 8.0, 0.0),
            (5.0, 10.0, 0.0),
        ]);
        // entities with only one side must not take part
        data.push(FeatureVector::new("only-a").with("a", 100.0));
        data.push(FeatureVector::new("only-b").with("b", -100.0));
        let pairs = find_correlations(&data, &["a", "b"], &CorrelationConfig::default());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].observations, 5);
        assert!((pairs[0].coefficient - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_not_reported() {
        let data = vectors(&[
            (1.0, 7.0, 0.0),
            (2.0, 7.0, 0.0),
            (3.0, 7.0, 0.0),
            (4.0, 7.0, 0.0),
            (5.0, 7.0, 0.0),
        ]);
        assert!(find_correlations(&data, &["a", "b"], &CorrelationConfig::default()).is_empty());
    }

    #[test]
    fn test_strength_labels_and_order() {
        // a-b perfectly anti-correlated; a-c and b-c share the same moderate magnitude
        let data = vectors(&[
            (1.0, 5.0, 2.0),
            (2.0, 4.0, 1.0),
            (3.0, 3.0, 4.0),
            (4.0, 2.0, 3.0),
            (5.0, 1.0, 3.0),
        ]);
        let pairs = find_correlations(&data, &["a", "b", "c"], &CorrelationConfig::default());
        assert_eq!(pairs.len(), 3);
        assert_eq!((pairs[0].feature_a.as_str(), pairs[0].feature_b.as_str()), ("a", "b"));
        assert!((pairs[0].coefficient + 1.0).abs() < 1e-12);
        assert_eq!(pairs[0].strength, CorrelationStrength::Strong);
        // r(a, c) = 4 / sqrt(10 * 5.2)
        assert_eq!((pairs[1].feature_a.as_str(), pairs[1].feature_b.as_str()), ("a", "c"));
        assert!((pairs[1].coefficient - 4.0 / 52.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(pairs[1].strength, CorrelationStrength::Medium);
        assert!(pairs.is_sorted_by(|x, y| x.coefficient.abs() >= y.coefficient.abs()));
    }
}
