//! Label-date collection: explodes issue label sets into sparse per-day counts.

use std::collections::BTreeMap;

use chrono_tz::Tz;
use trends_core::models::{Day, IssueObservation};
use trends_core::time_utils::day_of;

// ── SparseCounts ──────────────────────────────────────────────────────────────

/// Per-label, per-day issue counts with zero days omitted.
///
/// Both levels are ordered maps, so iteration is by label name and then by
/// day, independent of the order observations arrived in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseCounts {
    counts: BTreeMap<String, BTreeMap<Day, u64>>,
}

impl SparseCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one issue for `label` on `day`.
    pub fn increment(&mut self, label: &str, day: Day) {
        *self
            .counts
            .entry(label.to_string())
            .or_default()
            .entry(day)
            .or_default() += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct labels.
    pub fn label_count(&self) -> usize {
        self.counts.len()
    }

    /// The count recorded for `label` on `day` (0 when absent).
    pub fn get(&self, label: &str, day: Day) -> u64 {
        self.counts
            .get(label)
            .and_then(|days| days.get(&day))
            .copied()
            .unwrap_or(0)
    }

    /// Iterate labels with their day → count maps, by label name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<Day, u64>)> {
        self.counts.iter().map(|(label, days)| (label.as_str(), days))
    }

    /// Earliest and latest observed day across every label combined.
    pub fn day_bounds(&self) -> Option<(Day, Day)> {
        let mut bounds: Option<(Day, Day)> = None;
        for days in self.counts.values() {
            // Inner maps are ordered, so first/last are the label's extremes.
            let (Some((&first, _)), Some((&last, _))) =
                (days.first_key_value(), days.last_key_value())
            else {
                continue;
            };
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(first), max.max(last)),
                None => (first, last),
            });
        }
        bounds
    }
}

// ── LabelDateCollector ────────────────────────────────────────────────────────

/// Accumulates observations into [`SparseCounts`].
///
/// Observations may be fed in any order and in several batches (one per
/// backend page, say) before calling [`LabelDateCollector::finish`].
#[derive(Debug, Default)]
pub struct LabelDateCollector {
    timezone: Option<Tz>,
    counts: SparseCounts,
    observed: usize,
}

impl LabelDateCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket days in `tz` instead of the offset each timestamp carries.
    pub fn with_timezone(mut self, tz: Option<Tz>) -> Self {
        self.timezone = tz;
        self
    }

    /// Count one issue once per label occurrence.
    ///
    /// Labels are trimmed; a label repeated on the same issue is counted
    /// each time it appears. Issues without labels contribute nothing.
    pub fn observe(&mut self, observation: &IssueObservation) {
        self.observed += 1;
        if observation.labels.is_empty() {
            return;
        }

        let day = day_of(&observation.created, self.timezone);
        for label in &observation.labels {
            self.counts.increment(label.trim(), day);
        }
    }

    pub fn extend<'a>(&mut self, observations: impl IntoIterator<Item = &'a IssueObservation>) {
        for observation in observations {
            self.observe(observation);
        }
    }

    /// Number of observations seen so far, labelled or not.
    pub fn observed(&self) -> usize {
        self.observed
    }

    pub fn finish(self) -> SparseCounts {
        self.counts
    }

    /// Collect `observations` in one go.
    pub fn collect(observations: &[IssueObservation], tz: Option<Tz>) -> SparseCounts {
        let mut collector = Self::new().with_timezone(tz);
        collector.extend(observations);
        collector.finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn obs(labels: &[&str], ts: &str) -> IssueObservation {
        IssueObservation::new(
            labels.iter().copied(),
            DateTime::parse_from_rfc3339(ts).unwrap(),
        )
    }

    fn day(y: i32, m: u32, d: u32) -> Day {
        Day::from_ymd_opt(y, m, d).unwrap()
    }

    // ── observe ───────────────────────────────────────────────────────────────

    #[test]
    fn test_counts_per_label_and_day() {
        let counts = LabelDateCollector::collect(
            &[
                obs(&["bug"], "2024-01-01T08:00:00Z"),
                obs(&["bug"], "2024-01-01T20:00:00Z"),
                obs(&["bug", "ui"], "2024-01-03T10:00:00Z"),
            ],
            None,
        );

        assert_eq!(counts.label_count(), 2);
        assert_eq!(counts.get("bug", day(2024, 1, 1)), 2);
        assert_eq!(counts.get("bug", day(2024, 1, 3)), 1);
        assert_eq!(counts.get("bug", day(2024, 1, 2)), 0);
        assert_eq!(counts.get("ui", day(2024, 1, 3)), 1);
    }

    #[test]
    fn test_unlabelled_issues_contribute_nothing() {
        let mut collector = LabelDateCollector::new();
        collector.observe(&obs(&[], "2024-01-01T08:00:00Z"));
        assert_eq!(collector.observed(), 1);
        assert!(collector.finish().is_empty());
    }

    #[test]
    fn test_labels_are_trimmed() {
        let counts = LabelDateCollector::collect(
            &[
                obs(&["  bug "], "2024-01-01T08:00:00Z"),
                obs(&["bug"], "2024-01-01T09:00:00Z"),
            ],
            None,
        );
        assert_eq!(counts.label_count(), 1);
        assert_eq!(counts.get("bug", day(2024, 1, 1)), 2);
    }

    #[test]
    fn test_duplicate_labels_on_one_issue_each_count() {
        let counts =
            LabelDateCollector::collect(&[obs(&["bug", "bug"], "2024-01-01T08:00:00Z")], None);
        assert_eq!(counts.get("bug", day(2024, 1, 1)), 2);
    }

    #[test]
    fn test_time_of_day_is_discarded_in_reported_offset() {
        let counts = LabelDateCollector::collect(
            &[obs(&["bug"], "2024-01-01T23:59:59-05:00")],
            None,
        );
        assert_eq!(counts.get("bug", day(2024, 1, 1)), 1);
    }

    #[test]
    fn test_timezone_override_moves_day() {
        let tz: Tz = "UTC".parse().unwrap();
        let counts = LabelDateCollector::collect(
            &[obs(&["bug"], "2024-01-01T23:59:59-05:00")],
            Some(tz),
        );
        assert_eq!(counts.get("bug", day(2024, 1, 2)), 1);
        assert_eq!(counts.get("bug", day(2024, 1, 1)), 0);
    }

    #[test]
    fn test_batches_accumulate() {
        let mut collector = LabelDateCollector::new();
        collector.extend(&[obs(&["bug"], "2024-01-01T08:00:00Z")]);
        collector.extend(&[obs(&["bug"], "2024-01-01T09:00:00Z")]);
        assert_eq!(collector.observed(), 2);
        assert_eq!(collector.finish().get("bug", day(2024, 1, 1)), 2);
    }

    // ── day_bounds ────────────────────────────────────────────────────────────

    #[test]
    fn test_day_bounds_span_all_labels() {
        let counts = LabelDateCollector::collect(
            &[
                obs(&["a"], "2024-01-03T08:00:00Z"),
                obs(&["b"], "2024-01-01T08:00:00Z"),
                obs(&["a"], "2024-01-05T08:00:00Z"),
            ],
            None,
        );
        assert_eq!(counts.day_bounds(), Some((day(2024, 1, 1), day(2024, 1, 5))));
    }

    #[test]
    fn test_day_bounds_empty() {
        assert_eq!(SparseCounts::new().day_bounds(), None);
    }
}
