//! Collapses normalised label series into per-label totals.

use trends_core::models::{AggregateResult, TrendResults};

/// Stateless helper that sums each label's daily counts.
pub struct LabelAggregator;

impl LabelAggregator {
    /// Sum every series into a single total per label.
    ///
    /// The day axis plays no part; an empty series list yields an empty
    /// result.
    pub fn aggregate(results: &TrendResults) -> AggregateResult {
        results
            .data
            .iter()
            .map(|series| (series.name.as_str(), series.total()))
            .collect()
    }

    /// Total issue-label occurrences across all labels.
    pub fn calculate_total(aggregate: &AggregateResult) -> u64 {
        aggregate.iter().map(|(_, count)| count).sum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
