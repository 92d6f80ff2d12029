//! Main analysis pipeline for Label Trends.
//!
//! Runs collection and normalisation over a batch of observations and
//! returns the aligned series together with run metadata.

use chrono_tz::Tz;
use trends_core::models::{AggregateResult, IssueObservation, TrendResults};

use crate::aggregator::LabelAggregator;
use crate::collector::LabelDateCollector;
use crate::normalizer::SeriesNormalizer;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone)]
pub struct AnalysisMetadata {
    /// Total number of observations processed, labelled or not.
    pub observations_processed: usize,
    /// Number of distinct labels found.
    pub labels_found: usize,
    /// Length of the shared day axis.
    pub days_spanned: usize,
    /// Wall-clock seconds spent bucketing observations.
    pub collect_time_seconds: f64,
    /// Wall-clock seconds spent building the aligned series.
    pub normalize_time_seconds: f64,
}

/// The complete output of [`analyze_observations`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Aligned per-label series.
    pub results: TrendResults,
    /// Metadata about this analysis run.
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Collapse the series into per-label totals.
    pub fn aggregate(&self) -> AggregateResult {
        LabelAggregator::aggregate(&self.results)
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full engine over `observations`.
///
/// 1. Bucket every (label, day) pair via [`LabelDateCollector`].
/// 2. Align all labels on one zero-filled day axis via [`SeriesNormalizer`].
/// 3. Return an [`AnalysisResult`].
///
/// `timezone` selects the zone issue days are taken in; `None` keeps the
/// offset each timestamp was reported in.
pub fn analyze_observations(
    observations: &[IssueObservation],
    timezone: Option<Tz>,
) -> AnalysisResult {
    // ── Step 1: Collect ───────────────────────────────────────────────────────
    let collect_start = std::time::Instant::now();
    let counts = LabelDateCollector::collect(observations, timezone);
    let collect_time = collect_start.elapsed().as_secs_f64();

    // ── Step 2: Normalise ─────────────────────────────────────────────────────
    let normalize_start = std::time::Instant::now();
    let results = SeriesNormalizer::normalize(&counts);
    let normalize_time = normalize_start.elapsed().as_secs_f64();

    // ── Step 3: Build result ──────────────────────────────────────────────────
    let metadata = AnalysisMetadata {
        observations_processed: observations.len(),
        labels_found: results.data.len(),
        days_spanned: results.timepoints.len(),
        collect_time_seconds: collect_time,
        normalize_time_seconds: normalize_time,
    };

    tracing::debug!(
        observations = metadata.observations_processed,
        labels = metadata.labels_found,
        days = metadata.days_spanned,
        collect_secs = metadata.collect_time_seconds,
        normalize_secs = metadata.normalize_time_seconds,
        "analysis complete"
    );

    AnalysisResult { results, metadata }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use trends_core::models::Day;

    fn obs(labels: &[&str], ts: &str) -> IssueObservation {
        IssueObservation::new(
            labels.iter().copied(),
            DateTime::parse_from_rfc3339(ts).unwrap(),
        )
    }

    #[test]
    fn test_analyze_observations_metadata() {
        let analysis = analyze_observations(
            &[
                obs(&["bug"], "2024-01-01T10:00:00Z"),
                obs(&[], "2024-01-02T10:00:00Z"),
                obs(&["bug", "ui"], "2024-01-03T10:00:00Z"),
            ],
            None,
        );

        assert_eq!(analysis.metadata.observations_processed, 3);
        assert_eq!(analysis.metadata.labels_found, 2);
        assert_eq!(analysis.metadata.days_spanned, 3);
        assert!(analysis.metadata.collect_time_seconds >= 0.0);
        assert!(analysis.metadata.normalize_time_seconds >= 0.0);
        assert_eq!(analysis.results.series("ui").unwrap().values, vec![0, 0, 1]);
    }

    #[test]
    fn test_analyze_observations_empty() {
        let analysis = analyze_observations(&[], None);
        assert!(analysis.results.is_empty());
        assert!(analysis.results.timepoints.is_empty());
        assert_eq!(analysis.metadata.days_spanned, 0);
        assert!(analysis.aggregate().is_empty());
    }

    #[test]
    fn test_analyze_observations_aggregate() {
        let analysis = analyze_observations(
            &[
                obs(&["bug"], "2024-01-01T10:00:00Z"),
                obs(&["bug"], "2024-01-03T10:00:00Z"),
            ],
            None,
        );
        assert_eq!(analysis.aggregate().get("bug"), Some(2));
    }

    #[test]
    fn test_analyze_observations_timezone() {
        let tz: Tz = "Asia/Tokyo".parse().unwrap();
        let analysis = analyze_observations(&[obs(&["bug"], "2024-01-01T20:00:00Z")], Some(tz));
        assert_eq!(
            analysis.results.timepoints,
            vec![Day::from_ymd_opt(2024, 1, 2).unwrap()]
        );
    }
}
