//! Significance filtering of contact features
//!
//! Decides which feature keys carry enough signal to be used for relationship
//! scoring, and ranks the survivors by importance.
//!
//! # Algorithm
//!
//! 1. Collect the union of feature keys across all entities
//! 2. Gather usable values per key; keys without any value are excluded as [`ExclusionReason::NoData`]
//! 3. Compute [`FeatureStats`] (including coverage) for every remaining key
//! 4. Apply exclusion rules in order, first match wins:
//!    - coverage below `min_data_coverage`
//!    - a single distinct value
//!    - boolean-named keys (`is*`/`has*`) whose dominant value exceeds the dominance threshold;
//!      other boolean keys are kept with a fixed importance of `0.5`
//!    - coefficient of variation below `min_coefficient_of_variation`
//! 5. Rank significant keys by importance, descending
//! 6. Rebuild per-entity vectors containing only the significant keys
//!
//! # Examples
//!
//! ```
//! use rapport_analysis::{
//!     feature::FeatureVector,
//!     significance::{FilterConfig, SignificanceFilter},
//! };
//!
//! let vectors = vec![
//!     FeatureVector::new("a").with("y", 10.0).with("x", 1.0),
//!     FeatureVector::new("b").with("y", 50.0).with("x", 1.0),
//!     FeatureVector::new("c").with("y", 90.0).with("x", 1.0),
//! ];
//! let report = SignificanceFilter::new(FilterConfig::default()).apply(&vectors);
//!
//! assert_eq!(report.significant_keys().collect::<Vec<_>>(), ["y"]);
//! assert_eq!(report.exclusions[0].key, "x");
//! ```

use std::collections::BTreeMap;

use rapport_stats::feature_stats::FeatureStats;
use serde::{Deserialize, Serialize};

use crate::feature::{self, FeatureVector};

/// Importance assigned to boolean features that pass the dominance check.
pub const BOOLEAN_IMPORTANCE: f64 = 0.5;

const CV_WEIGHT: f64 = 0.3;
const CV_CAP: f64 = 2.0;
const ENTROPY_WEIGHT: f64 = 0.2;
const COVERAGE_WEIGHT: f64 = 0.2;
const PRIORITY_BONUS: f64 = 0.3;

/// Thresholds controlling feature exclusion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Minimum coefficient of variation for non-boolean features
    pub min_coefficient_of_variation: f64,
    /// Entropy threshold. Reported via [`FilterReport::entropy_warnings`], never used for exclusion.
    pub min_entropy: f64,
    /// Minimum fraction of entities that must provide a value
    pub min_data_coverage: f64,
    /// Boolean features whose dominant value share exceeds this are excluded
    pub boolean_dominance_threshold: f64,
    /// Keys receiving an importance bonus
    pub high_priority_features: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_coefficient_of_variation: 0.1,
            min_entropy: 0.5,
            min_data_coverage: 0.3,
            boolean_dominance_threshold: 0.9,
            high_priority_features: [
                "totalMeetings",
                "totalMemos",
                "daysSinceLastContact",
                "totalGifts",
                "totalEvents",
                "totalChats",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Why a feature key was excluded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
    #[display("no data")]
    NoData,
    #[display("coverage too low ({coverage:.2} < {min:.2})")]
    LowCoverage { coverage: f64, min: f64 },
    #[display("constant feature")]
    ConstantFeature,
    #[display("skewed boolean (dominant ratio {dominant_ratio:.2} > {threshold:.2})")]
    SkewedBoolean { dominant_ratio: f64, threshold: f64 },
    #[display("low variance (cv {coefficient_of_variation:.3} < {min:.3})")]
    LowVariance {
        coefficient_of_variation: f64,
        min: f64,
    },
}

/// Outcome of the filter for one feature key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FilterDecision {
    Significant { importance: f64 },
    Excluded { reason: ExclusionReason },
}

impl FilterDecision {
    #[must_use]
    pub fn is_significant(&self) -> bool {
        matches!(self, FilterDecision::Significant { .. })
    }

    #[must_use]
    pub fn importance(&self) -> Option<f64> {
        match self {
            FilterDecision::Significant { importance } => Some(*importance),
            FilterDecision::Excluded { .. } => None,
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<&ExclusionReason> {
        match self {
            FilterDecision::Significant { .. } => None,
            FilterDecision::Excluded { reason } => Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantFeature {
    pub key: String,
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    pub key: String,
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSummary {
    pub entity_count: usize,
    pub total_features: usize,
    pub significant_count: usize,
    pub excluded_count: usize,
}

/// Result of a filter run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterReport {
    /// Per-entity vectors restricted to significant keys, in input order
    pub filtered: Vec<FeatureVector>,
    /// Significant keys ranked by importance, descending
    pub significant_features: Vec<SignificantFeature>,
    /// Statistics of every key that had at least one value, excluded keys included
    pub stats: BTreeMap<String, FeatureStats>,
    /// Decision for every key
    pub decisions: BTreeMap<String, FilterDecision>,
    /// Excluded keys in key order
    pub exclusions: Vec<Exclusion>,
    pub summary: FilterSummary,
}

impl FilterReport {
    /// Significant keys in rank order.
    pub fn significant_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.significant_features.iter().map(|f| f.key.as_str())
    }

    /// 1-based rank of a significant key.
    #[must_use]
    pub fn rank_of(&self, key: &str) -> Option<usize> {
        self.significant_keys()
            .position(|k| k == key)
            .map(|idx| idx + 1)
    }

    /// Significant keys whose normalized entropy is below `min_entropy`.
    ///
    /// Entropy does not gate exclusion; this only surfaces low-diversity features
    /// for diagnostics.
    #[must_use]
    pub fn entropy_warnings(&self, min_entropy: f64) -> Vec<&str> {
        self.significant_keys()
            .filter(|key| {
                self.stats
                    .get(*key)
                    .is_some_and(|stats| stats.entropy < min_entropy)
            })
            .collect()
    }
}

/// Feature significance filter
#[derive(Debug, Clone, Default)]
pub struct SignificanceFilter {
    config: FilterConfig,
}

impl SignificanceFilter {
    #[must_use]
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Runs the filter over all entity vectors.
    ///
    /// Never fails: every key ends up either significant or excluded with a reason.
    /// An empty input yields an empty report.
    #[must_use]
    pub fn apply(&self, vectors: &[FeatureVector]) -> FilterReport {
        if vectors.is_empty() {
            return FilterReport::default();
        }

        let mut stats = BTreeMap::new();
        let mut decisions = BTreeMap::new();
        let mut exclusions = vec![];
        let mut significant_features = vec![];

        for key in feature::feature_keys(vectors) {
            let samples = feature::column(vectors, key);
            let decision = match FeatureStats::from_samples(&samples, vectors.len()) {
                Some(feature_stats) => {
                    let decision = self.decide(key, &feature_stats);
                    stats.insert(key.to_owned(), feature_stats);
                    decision
                }
                None => FilterDecision::Excluded {
                    reason: ExclusionReason::NoData,
                },
            };

            match &decision {
                FilterDecision::Significant { importance } => {
                    significant_features.push(SignificantFeature {
                        key: key.to_owned(),
                        importance: *importance,
                    });
                }
                FilterDecision::Excluded { reason } => {
                    tracing::debug!(feature = key, %reason, "feature excluded");
                    exclusions.push(Exclusion {
                        key: key.to_owned(),
                        reason: reason.clone(),
                    });
                }
            }
            decisions.insert(key.to_owned(), decision);
        }

        significant_features.sort_by(|a, b| b.importance.total_cmp(&a.importance));

        let filtered = vectors
            .iter()
            .map(|vector| vector.retain_keys(significant_features.iter().map(|f| f.key.as_str())))
            .collect();

        let summary = FilterSummary {
            entity_count: vectors.len(),
            total_features: decisions.len(),
            significant_count: significant_features.len(),
            excluded_count: exclusions.len(),
        };
        tracing::info!(
            entities = summary.entity_count,
            features = summary.total_features,
            significant = summary.significant_count,
            excluded = summary.excluded_count,
            "feature filtering finished"
        );

        FilterReport {
            filtered,
            significant_features,
            stats,
            decisions,
            exclusions,
            summary,
        }
    }

    fn decide(&self, key: &str, stats: &FeatureStats) -> FilterDecision {
        let config = &self.config;
        let excluded = |reason| FilterDecision::Excluded { reason };

        if stats.coverage < config.min_data_coverage {
            return excluded(ExclusionReason::LowCoverage {
                coverage: stats.coverage,
                min: config.min_data_coverage,
            });
        }

        if stats.is_constant() {
            return excluded(ExclusionReason::ConstantFeature);
        }

        if is_boolean_key(key) {
            let mean = stats.descriptive.mean;
            let dominant_ratio = f64::max(mean, 1.0 - mean);
            if dominant_ratio > config.boolean_dominance_threshold {
                return excluded(ExclusionReason::SkewedBoolean {
                    dominant_ratio,
                    threshold: config.boolean_dominance_threshold,
                });
            }
            return FilterDecision::Significant {
                importance: BOOLEAN_IMPORTANCE,
            };
        }

        // a non-finite cv carries no usable spread information
        let cv = stats.descriptive.coefficient_of_variation;
        if !cv.is_finite() || cv < config.min_coefficient_of_variation {
            return excluded(ExclusionReason::LowVariance {
                coefficient_of_variation: cv,
                min: config.min_coefficient_of_variation,
            });
        }

        let priority_bonus = if config.high_priority_features.iter().any(|f| f == key) {
            PRIORITY_BONUS
        } else {
            0.0
        };
        let importance = cv.min(CV_CAP) * CV_WEIGHT
            + stats.entropy * ENTROPY_WEIGHT
            + stats.coverage * COVERAGE_WEIGHT
            + priority_bonus;
        FilterDecision::Significant { importance }
    }
}

/// Keys following the `isX` / `hasX` naming convention are boolean features.
#[must_use]
pub fn is_boolean_key(key: &str) -> bool {
    key.starts_with("is") || key.starts_with("has")
}
