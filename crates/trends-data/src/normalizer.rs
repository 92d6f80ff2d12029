//! Series normalisation: sparse counts → aligned, zero-filled daily series.

use std::collections::BTreeMap;

use trends_core::models::{Day, LabelSeries, TrendResults};

use crate::collector::SparseCounts;

/// Stateless helper that aligns every label onto one shared day axis.
pub struct SeriesNormalizer;

impl SeriesNormalizer {
    /// Build the shared day axis and one zero-filled series per label.
    ///
    /// The axis runs from the earliest to the latest observed day across all
    /// labels, one entry per calendar day. Every series has exactly one value
    /// per axis day; series are ordered by label name.
    pub fn normalize(counts: &SparseCounts) -> TrendResults {
        let Some((min_day, max_day)) = counts.day_bounds() else {
            return TrendResults::empty();
        };

        let timepoints = Self::day_axis(min_day, max_day);
        let data = counts
            .iter()
            .map(|(label, days)| LabelSeries {
                name: label.to_string(),
                values: Self::fill(label, days, &timepoints),
            })
            .collect();

        TrendResults { timepoints, data }
    }

    /// Every calendar day from `min_day` to `max_day` inclusive.
    pub fn day_axis(min_day: Day, max_day: Day) -> Vec<Day> {
        min_day
            .iter_days()
            .take_while(|day| *day <= max_day)
            .collect()
    }

    /// Lay `days` out along `axis`, using 0 for days with no issues.
    ///
    /// Panics if a counted day falls outside the axis: that would mean the
    /// axis was computed from different data and every series is suspect.
    fn fill(
        label: &str,
        days: &BTreeMap<Day, u64>,
        axis: &[Day],
    ) -> Vec<u64> {
        let Some(&start) = axis.first() else {
            return Vec::new();
        };

        // Full coverage: the ordered map already is the series.
        if days.len() == axis.len() {
            let values: Vec<u64> = days.values().copied().collect();
            debug_assert!(days.keys().copied().eq(axis.iter().copied()));
            return values;
        }

        let mut values = vec![0u64; axis.len()];
        for (day, count) in days {
            let offset = day.signed_duration_since(start).num_days();
            let slot = usize::try_from(offset).ok().filter(|slot| *slot < axis.len());
            let Some(slot) = slot else {
                panic!(
                    "day {} for label {:?} lies outside the axis {}..={}",
                    day,
                    label,
                    start,
                    axis[axis.len() - 1]
                );
            };
            values[slot] = *count;
        }
        values
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
