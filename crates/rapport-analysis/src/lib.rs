//! Feature significance analysis for contact relationship scoring
//!
//! This crate decides which per-contact features carry signal, ranks them, and
//! reports correlated feature pairs. It takes feature vectors produced by the
//! extraction pipeline and hands back filtered vectors for scoring.
//!
//! # Overview
//!
//! 1. **Feature Vectors** ([`feature::FeatureVector`]): per-entity feature maps
//! 2. **Derived Features** ([`formula::Formula`]): optional arithmetic combinations of existing keys
//! 3. **Significance Filter** ([`significance::SignificanceFilter`]): coverage, constancy,
//!    boolean skew and variance rules, importance ranking
//! 4. **Correlation Analysis** ([`correlation::find_correlations`]): Pearson correlation
//!    between significant features
//!
//! All operations are pure and deterministic; none of them perform I/O.
//!
//! # Examples
//!
//! ```
//! use rapport_analysis::{
//!     correlation::{CorrelationConfig, find_correlations},
//!     feature::FeatureVector,
//!     significance::SignificanceFilter,
//! };
//!
//! let vectors = (1..=6)
//!     .map(|i| {
//!         let i = f64::from(i);
//!         FeatureVector::new(format!("contact-{i}"))
//!             .with("totalMeetings", i * 2.0)
//!             .with("totalMemos", i * 3.0 + 1.0)
//!             .with("isFavorite", false)
//!     })
//!     .collect::<Vec<_>>();
//!
//! let report = SignificanceFilter::default().apply(&vectors);
//! assert_eq!(report.summary.significant_count, 2);
//!
//! let keys = report.significant_keys().collect::<Vec<_>>();
//! let pairs = find_correlations(&report.filtered, &keys, &CorrelationConfig::default());
//! assert_eq!(pairs.len(), 1);
//! ```

pub mod correlation;
pub mod feature;
pub mod formula;
pub mod significance;
