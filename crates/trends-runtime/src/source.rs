//! Issue sources feeding the aggregation engine.

use std::path::PathBuf;

use async_trait::async_trait;
use trends_core::error::{Result, TrendsError};
use trends_core::models::IssueObservation;
use trends_data::reader::load_observations;

/// Something that can turn a backend query into issue observations.
///
/// Implementations return every matching issue, all pages concatenated, or
/// fail as a whole; partial results are never returned.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch all issues matching `query`.
    async fn fetch_issues(&self, query: &str) -> Result<Vec<IssueObservation>>;
}

/// Reads issues from an exported dump instead of a live backend.
#[derive(Debug, Clone)]
pub struct DumpSource {
    path: PathBuf,
}

impl DumpSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl IssueSource for DumpSource {
    fn name(&self) -> &'static str {
        "dump"
    }

    /// The query cannot be evaluated offline, so the dump is returned whole.
    async fn fetch_issues(&self, query: &str) -> Result<Vec<IssueObservation>> {
        tracing::debug!(
            path = %self.path.display(),
            query,
            "query ignored for dump source"
        );
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || load_observations(&path))
            .await
            .map_err(|e| TrendsError::BackendFetch(format!("dump reader task failed: {}", e)))?
    }
}
