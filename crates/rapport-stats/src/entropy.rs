//! Normalized Shannon entropy over discrete sample values
//!
//! Samples are treated as categories even when numeric: two samples fall into
//! the same category only when they are exactly equal.

use std::collections::BTreeMap;

/// Bit pattern used as the category key. `-0.0` is folded into `0.0`.
fn category_key(value: f64) -> u64 {
    let value = if value == 0.0 { 0.0 } else { value };
    value.to_bits()
}

fn frequency_table(values: &[f64]) -> BTreeMap<u64, usize> {
    let mut table = BTreeMap::new();
    for &value in values {
        *table.entry(category_key(value)).or_insert(0) += 1;
    }
    table
}

/// Number of distinct values in the dataset.
///
/// # Examples
///
/// ```
/// use rapport_stats::entropy::distinct_count;
///
/// assert_eq!(distinct_count(&[1.0, 1.0, 2.0]), 2);
/// assert_eq!(distinct_count(&[]), 0);
/// ```
#[must_use]
pub fn distinct_count(values: &[f64]) -> usize {
    frequency_table(values).len()
}

/// Shannon entropy in bits divided by `log2(distinct values)`.
///
/// The result lies in `[0, 1]`. It is `0.0` when fewer than two distinct
/// values exist.
///
/// # Examples
///
/// ```
/// use rapport_stats::entropy::normalized_entropy;
///
/// assert_eq!(normalized_entropy(&[3.0, 3.0, 3.0]), 0.0);
/// assert!((normalized_entropy(&[1.0, 2.0, 3.0, 4.0]) - 1.0).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn normalized_entropy(values: &[f64]) -> f64 {
    let table = frequency_table(values);
    if table.len() < 2 {
        return 0.0;
    }
    let total = values.len() as f64;
    let entropy = table
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum::<f64>();
    let max_entropy = (table.len() as f64).log2();
    (entropy / max_entropy).clamp(0.0, 1.0)
}
