//! End-to-end search: filter → JQL → fetch → aligned series or totals.
//!
//! Every call owns its own counts and day axis; the service itself holds no
//! mutable state, so one instance can serve concurrent searches.

use chrono_tz::Tz;
use serde::Serialize;
use trends_core::error::Result;
use trends_core::models::{AggregateResult, TrendResults};
use trends_core::query::{query_for_params, SearchParams};
use trends_data::analysis::analyze_observations;

use crate::source::IssueSource;

// ── Public types ──────────────────────────────────────────────────────────────

/// What a search produced, depending on whether totals were requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    /// Per-label daily series on a shared day axis.
    Series(TrendResults),
    /// Per-label totals.
    Aggregate(AggregateResult),
}

// ── SearchService ─────────────────────────────────────────────────────────────

/// Runs searches against one [`IssueSource`].
pub struct SearchService {
    source: Box<dyn IssueSource>,
    timezone: Option<Tz>,
}

impl SearchService {
    /// Create a service.
    ///
    /// # Parameters
    /// - `source`   – where issues are fetched from.
    /// - `timezone` – zone issue days are taken in; `None` keeps the offset
    ///   each timestamp was reported in.
    pub fn new(source: Box<dyn IssueSource>, timezone: Option<Tz>) -> Self {
        Self { source, timezone }
    }

    /// Run one search.
    ///
    /// A backend failure aborts the search with no partial result. An empty
    /// match set is not an error and yields empty output.
    pub async fn run(&self, params: &SearchParams) -> Result<SearchOutcome> {
        let query = query_for_params(params);
        tracing::info!(source = self.source.name(), query = %query, "searching issues");

        let observations = self.source.fetch_issues(&query).await?;
        let analysis = analyze_observations(&observations, self.timezone);

        tracing::info!(
            issues = analysis.metadata.observations_processed,
            labels = analysis.metadata.labels_found,
            days = analysis.metadata.days_spanned,
            "search complete"
        );

        if params.aggregate {
            Ok(SearchOutcome::Aggregate(analysis.aggregate()))
        } else {
            Ok(SearchOutcome::Series(analysis.results))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
