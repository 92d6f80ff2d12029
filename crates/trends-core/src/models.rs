use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A calendar day with no time component.
pub type Day = NaiveDate;

/// A single issue as seen by the aggregation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueObservation {
    /// Labels attached to the issue, untrimmed and possibly repeated.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Creation timestamp in the offset the backend reported.
    pub created: DateTime<FixedOffset>,
}

impl IssueObservation {
    pub fn new<I, S>(labels: I, created: DateTime<FixedOffset>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            created,
        }
    }
}

/// One label's counts, positionally aligned with [`TrendResults::timepoints`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSeries {
    /// The (trimmed) label name.
    pub name: String,
    /// One count per day of the shared day axis, oldest first.
    pub values: Vec<u64>,
}

impl LabelSeries {
    /// Sum of all daily counts.
    pub fn total(&self) -> u64 {
        self.values.iter().sum()
    }
}

/// Normalised per-day series for every label that matched a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendResults {
    /// The shared, gap-free day axis.
    pub timepoints: Vec<Day>,
    /// Per-label series, sorted by label name.
    pub data: Vec<LabelSeries>,
}

impl TrendResults {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Look up the series for `label`.
    pub fn series(&self, label: &str) -> Option<&LabelSeries> {
        self.data.iter().find(|s| s.name == label)
    }
}

// ── Aggregates ────────────────────────────────────────────────────────────────

/// A label's name paired with its total issue count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    pub count: u64,
}

/// Wire shape of an [`AggregateResult`]: `{"data": [{"name", "count"}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub data: Vec<NamedCount>,
}

/// Per-label totals with the day dimension collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "AggregateReport")]
pub struct AggregateResult {
    totals: BTreeMap<String, u64>,
}

impl AggregateResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` to the running total for `label`.
    pub fn add(&mut self, label: impl Into<String>, count: u64) {
        *self.totals.entry(label.into()).or_default() += count;
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.totals.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Iterate `(label, total)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.totals.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl From<AggregateResult> for AggregateReport {
    fn from(result: AggregateResult) -> Self {
        AggregateReport {
            data: result
                .totals
                .into_iter()
                .map(|(name, count)| NamedCount { name, count })
                .collect(),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for AggregateResult {
    fn from_iter<T: IntoIterator<Item = (S, u64)>>(iter: T) -> Self {
        let mut result = AggregateResult::new();
        for (label, count) in iter {
            result.add(label, count);
        }
        result
    }
}
