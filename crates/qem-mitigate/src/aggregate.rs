//! Aggregation of measurement outcome counts.

use std::collections::BTreeMap;

/// Outcome counts of one circuit execution, keyed by bitstring.
///
/// Values are `f64` so normalized or averaged distributions can be
/// aggregated again.
pub type Counts = BTreeMap<String, f64>;

/// Sum counts per outcome across executions.
///
/// With `normalize`, every mapping is divided by the number of mappings
/// first, which turns the sum into the per-outcome mean. Outcomes missing
/// from a mapping contribute zero.
#[allow(clippy::cast_precision_loss)]
pub fn aggregate_counts(data: &[Counts], normalize: bool) -> Counts {
    let total = if normalize { data.len() as f64 } else { 1.0 };
    let mut aggregated = Counts::new();

    for counts in data {
        for (outcome, &count) in counts {
            *aggregated.entry(outcome.clone()).or_insert(0.0) += count / total;
        }
    }

    aggregated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, f64)]) -> Counts {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_sum_without_normalization() {
        let data = [counts(&[("00", 3.0), ("01", 1.0)]), counts(&[("00", 1.0)])];
        let result = aggregate_counts(&data, false);
        assert_eq!(result.len(), 2);
        assert_eq!(result["00"], 4.0);
        assert_eq!(result["01"], 1.0);
    }

    #[test]
    fn test_normalized_mean() {
        let data = [counts(&[("00", 3.0), ("01", 1.0)]), counts(&[("00", 1.0)])];
        let result = aggregate_counts(&data, true);
        assert_eq!(result["00"], 2.0);
        assert_eq!(result["01"], 0.5);
    }

    #[test]
    fn test_reaggregates_fractional_distributions() {
        let first = aggregate_counts(
            &[counts(&[("00", 3.0), ("11", 1.0)]), counts(&[("11", 2.0)])],
            true,
        );
        assert_eq!(first["00"], 1.5);
        assert_eq!(first["11"], 1.5);

        let second = aggregate_counts(&[first, counts(&[("00", 0.25)])], false);
        assert_eq!(second["00"], 1.75);
        assert_eq!(second["11"], 1.5);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_counts(&[], false).is_empty());
        assert!(aggregate_counts(&[], true).is_empty());
    }
}
