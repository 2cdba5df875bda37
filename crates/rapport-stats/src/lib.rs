//! Statistical primitives for relationship feature analysis.
//!
//! This crate provides the numeric building blocks used by the feature
//! significance filter and correlation analyzer:
//!
//! - **Descriptive statistics**: mean, population variance, standard deviation,
//!   coefficient of variation
//! - **Percentiles**: nearest-rank quartiles without interpolation
//! - **Entropy**: Shannon entropy over discrete values, normalized to `[0, 1]`
//! - **Feature statistics**: all of the above plus data coverage for one feature key
//! - **Correlation**: Pearson correlation coefficient
//!
//! Every function is pure: the same input always yields the same output.
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use rapport_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.variance, 2.0);
//! ```
//!
//! ## Profiling a feature column
//!
//! ```
//! use rapport_stats::feature_stats::FeatureStats;
//!
//! let stats = FeatureStats::from_samples(&[1.0, 2.0, 3.0, 4.0], 8).unwrap();
//! assert_eq!(stats.coverage, 0.5);
//! assert_eq!(stats.entropy, 1.0);
//! ```

pub mod correlation;
pub mod descriptive;
pub mod entropy;
pub mod feature_stats;
pub mod percentiles;
