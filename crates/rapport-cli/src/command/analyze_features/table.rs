//! Tabular display of significance results
//!
//! Tables go to stderr; stdout is reserved for the JSON report.

use rapport_analysis::{correlation::CorrelationPair, significance::FilterReport};

fn print_separator(width: usize) {
    eprintln!("  {}", "-".repeat(width));
}

/// Print significant features in rank order
pub(super) fn print_significant_table(report: &FilterReport) {
    eprintln!("Significant features ({}):", report.summary.significant_count);
    eprintln!(
        "  {:>4} {:<28} {:>10} {:>10} {:>8} {:>8} {:>9}",
        "Rank", "Feature", "Importance", "Mean", "CV", "Entropy", "Coverage",
    );
    // rank(4) + feature(28) + importance(10) + mean(10) + cv(8) + entropy(8) + coverage(9) + spaces(6)
    print_separator(83);

    for (idx, feature) in report.significant_features.iter().enumerate() {
        let Some(stats) = report.stats.get(&feature.key) else {
            continue;
        };
        eprintln!(
            "  {:>4} {:<28} {:>10.3} {:>10.2} {:>8.3} {:>8.3} {:>8.1}%",
            idx + 1,
            feature.key,
            feature.importance,
            stats.descriptive.mean,
            stats.descriptive.coefficient_of_variation,
            stats.entropy,
            stats.coverage * 100.0,
        );
    }
}

/// Print excluded features with their reasons
pub(super) fn print_exclusion_table(report: &FilterReport) {
    eprintln!("Excluded features ({}):", report.summary.excluded_count);
    eprintln!("  {:<28} Reason", "Feature");
    print_separator(70);

    for exclusion in &report.exclusions {
        eprintln!("  {:<28} {}", exclusion.key, exclusion.reason);
    }
}

/// Print correlated feature pairs
pub(super) fn print_correlation_table(pairs: &[CorrelationPair]) {
    eprintln!("Correlated pairs ({}):", pairs.len());
    eprintln!(
        "  {:<28} {:<28} {:>8} {:>8}",
        "Feature A", "Feature B", "r", "Strength",
    );
    // feature_a(28) + feature_b(28) + r(8) + strength(8) + spaces(3)
    print_separator(75);

    for pair in pairs {
        eprintln!(
            "  {:<28} {:<28} {:>8.3} {:>8}",
            pair.feature_a,
            pair.feature_b,
            pair.coefficient,
            pair.strength.to_string(),
        );
    }
}
