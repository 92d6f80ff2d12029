//! REST client for the Jira issue search and project APIs.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};
use trends_core::error::{Result, TrendsError};
use trends_core::models::IssueObservation;
use trends_core::settings::JiraConfig;
use trends_data::reader::{JiraIssue, SearchPage};

use crate::source::IssueSource;

/// Issues requested per search page unless overridden.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Only these fields are needed to bucket issues.
const SEARCH_FIELDS: &str = "labels,created";

/// Jira REST client authenticated with a user + API token pair.
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: reqwest::Client,
    base_url: String,
    user: String,
    api_token: String,
    page_size: u32,
}

#[derive(Debug, Deserialize)]
struct Component {
    name: String,
}

impl JiraClient {
    /// Create a client for the instance described by `config`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed
    pub fn new(config: &JiraConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| TrendsError::BackendFetch(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user: config.user.clone(),
            api_token: config.api_token.clone(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Override the number of issues requested per page.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// GET `path` relative to the base URL and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.user, Some(&self.api_token))
            .query(query)
            .send()
            .await
            .map_err(|e| TrendsError::BackendFetch(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrendsError::BackendFetch(format!(
                "Jira returned error status {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| TrendsError::BackendFetch(format!("failed to decode Jira response: {}", e)))
    }

    /// Run `jql` and collect every page of results.
    #[instrument(skip(self))]
    pub async fn search_issues(&self, jql: &str) -> Result<Vec<JiraIssue>> {
        let mut issues = Vec::new();
        let mut start_at: u64 = 0;

        loop {
            let page: SearchPage = self
                .get_json(
                    "rest/api/2/search",
                    &[
                        ("jql", jql.to_string()),
                        ("startAt", start_at.to_string()),
                        ("maxResults", self.page_size.to_string()),
                        ("fields", SEARCH_FIELDS.to_string()),
                    ],
                )
                .await?;

            let received = page.issues.len() as u64;
            debug!(
                start_at,
                received,
                total = page.total,
                "fetched search page"
            );

            issues.extend(page.issues);
            start_at += received;

            if received == 0 || start_at >= page.total {
                break;
            }
        }

        Ok(issues)
    }

    /// Names of the components defined in `project`, in backend order.
    #[instrument(skip(self))]
    pub async fn list_components(&self, project: &str) -> Result<Vec<String>> {
        let path = format!("rest/api/3/project/{}/components", project);
        let components: Vec<Component> = self.get_json(&path, &[]).await?;
        Ok(components.into_iter().map(|c| c.name).collect())
    }
}

#[async_trait]
impl IssueSource for JiraClient {
    fn name(&self) -> &'static str {
        "jira"
    }

    async fn fetch_issues(&self, query: &str) -> Result<Vec<IssueObservation>> {
        self.search_issues(query)
            .await?
            .into_iter()
            .map(JiraIssue::into_observation)
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
