//! Jira issue decoding and offline dump loading.
//!
//! The wire types here are shared with the live Jira client so that a saved
//! search response and a fetched one decode identically.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use trends_core::error::{Result, TrendsError};
use trends_core::models::IssueObservation;
use trends_core::time_utils::parse_created;
use tracing::{debug, warn};

// ── Wire types ────────────────────────────────────────────────────────────────

/// One page of a Jira `/search` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub start_at: u64,
    #[serde(default)]
    pub max_results: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub issues: Vec<JiraIssue>,
}

/// A Jira issue reduced to the fields the engine needs.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssue {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub fields: JiraFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JiraFields {
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub created: Option<String>,
}

impl JiraIssue {
    /// Convert into an [`IssueObservation`].
    ///
    /// Fails when `created` is missing or unparseable; such an issue cannot
    /// be placed on the day axis.
    pub fn into_observation(self) -> Result<IssueObservation> {
        let key = self.key.unwrap_or_else(|| "<unknown>".to_string());
        let created = self
            .fields
            .created
            .ok_or_else(|| TrendsError::MalformedIssue(format!("{} has no created date", key)))?;
        let created = parse_created(&created)?;

        Ok(IssueObservation {
            labels: self.fields.labels.unwrap_or_default(),
            created,
        })
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.json` / `.jsonl` dump files under `path`, sorted by path.
///
/// A path naming a single file is returned as-is whatever its extension.
pub fn find_dump_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    if !path.exists() {
        warn!("Dump path does not exist: {}", path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && dump_format(entry.path()).is_some())
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load every issue from the dump file or directory at `path`.
pub fn load_observations(path: &Path) -> Result<Vec<IssueObservation>> {
    if !path.exists() {
        return Err(TrendsError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "path does not exist"),
        });
    }

    let files = find_dump_files(path);
    let mut observations = Vec::new();

    for file_path in &files {
        let issues = match dump_format(file_path).unwrap_or(DumpFormat::Json) {
            DumpFormat::Json => read_json_file(file_path)?,
            DumpFormat::JsonLines => read_jsonl_file(file_path)?,
        };
        debug!("File {}: {} issues", file_path.display(), issues.len());

        for issue in issues {
            observations.push(issue.into_observation()?);
        }
    }

    debug!(
        "Loaded {} issues from {} files",
        observations.len(),
        files.len()
    );

    Ok(observations)
}

/// Decode a JSON document holding either a search page or a bare issue array.
pub fn parse_issue_document(text: &str) -> Result<Vec<JiraIssue>> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if value.is_array() {
        return Ok(serde_json::from_value(value)?);
    }
    if value.get("issues").is_some() {
        let page: SearchPage = serde_json::from_value(value)?;
        return Ok(page.issues);
    }
    Err(TrendsError::MalformedIssue(
        "expected a search response or an array of issues".to_string(),
    ))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DumpFormat {
    Json,
    JsonLines,
}

fn dump_format(path: &Path) -> Option<DumpFormat> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Some(DumpFormat::Json),
        Some("jsonl") => Some(DumpFormat::JsonLines),
        _ => None,
    }
}

fn read_json_file(path: &Path) -> Result<Vec<JiraIssue>> {
    let text = std::fs::read_to_string(path).map_err(|source| TrendsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_issue_document(&text)
}

/// One issue per line; blank lines are skipped, an undecodable line aborts.
fn read_jsonl_file(path: &Path) -> Result<Vec<JiraIssue>> {
    let file = std::fs::File::open(path).map_err(|source| TrendsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut issues = Vec::new();
    for (index, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| TrendsError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let issue = serde_json::from_str::<JiraIssue>(trimmed).map_err(|e| {
            TrendsError::MalformedIssue(format!(
                "line {} of {}: {}",
                index + 1,
                path.display(),
                e
            ))
        })?;
        issues.push(issue);
    }
    Ok(issues)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
