use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::error::{Result, TrendsError};
use crate::query::SearchParams;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Per-day issue counts by label from Jira
#[derive(Parser, Debug, Clone)]
#[command(
    name = "label-trends",
    about = "Per-day issue counts by label from Jira",
    version
)]
pub struct Settings {
    /// Jira base URL, e.g. https://example.atlassian.net
    #[arg(long, env = "JIRA_BASE_URL", global = true)]
    pub jira_base_url: Option<String>,

    /// Jira user (usually an email address)
    #[arg(long, env = "JIRA_USER", global = true)]
    pub jira_user: Option<String>,

    /// Jira API token
    #[arg(long, env = "JIRA_API_TOKEN", global = true, hide_env_values = true)]
    pub jira_api_token: Option<String>,

    /// Logging level
    #[arg(long, default_value = "INFO", global = true, value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path (defaults to stderr)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do once configured.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search issues and print per-label daily counts as JSON
    Search(SearchArgs),
    /// List the component names of a project
    Components {
        /// Project key
        #[arg(long)]
        project: String,
    },
    /// Print the JQL a search would run, without running it
    Query {
        #[command(flatten)]
        params: SearchParams,
    },
}

/// Arguments of the `search` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub params: SearchParams,

    /// IANA timezone used to decide which day an issue was created on
    #[arg(long)]
    pub timezone: Option<String>,

    /// Issues requested per backend page
    #[arg(long, default_value = "50", value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub page_size: u32,

    /// Read exported issues from a file or directory instead of Jira
    #[arg(long)]
    pub input: Option<PathBuf>,
}

/// Validated Jira connection details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraConfig {
    pub base_url: String,
    pub user: String,
    pub api_token: String,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve the `--debug` override.
    pub fn load() -> Self {
        Self::load_from(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Collect the Jira credentials, failing on the first missing one.
    pub fn jira_config(&self) -> Result<JiraConfig> {
        Ok(JiraConfig {
            base_url: required(&self.jira_base_url, "JIRA_BASE_URL")?,
            user: required(&self.jira_user, "JIRA_USER")?,
            api_token: required(&self.jira_api_token, "JIRA_API_TOKEN")?,
        })
    }
}

fn required(value: &Option<String>, env_name: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(TrendsError::Config(format!("must set {:?}", env_name))),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_credentials(base: Option<&str>, user: Option<&str>, token: Option<&str>) -> Settings {
        let mut settings = Settings::parse_from(["label-trends", "query"]);
        settings.jira_base_url = base.map(str::to_string);
        settings.jira_user = user.map(str::to_string);
        settings.jira_api_token = token.map(str::to_string);
        settings
    }

    // ── parsing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_search_defaults() {
        let settings = Settings::parse_from(["label-trends", "search", "--project", "OPS"]);
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
        match settings.command {
            Command::Search(args) => {
                assert_eq!(args.params.project.as_deref(), Some("OPS"));
                assert_eq!(args.page_size, 50);
                assert!(args.timezone.is_none());
                assert!(args.input.is_none());
                assert!(!args.params.aggregate);
                assert!(!args.params.pretty);
            }
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_search_repeated_labels_and_dates() {
        let settings = Settings::parse_from([
            "label-trends",
            "search",
            "--label",
            "bug",
            "--label",
            "ui",
            "--created-after",
            "2024-1-5",
            "--aggregate",
        ]);
        let Command::Search(args) = settings.command else {
            panic!("expected search");
        };
        assert_eq!(args.params.labels, vec!["bug".to_string(), "ui".to_string()]);
        assert_eq!(
            args.params.created_after,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert!(args.params.aggregate);
    }

    #[test]
    fn test_search_rejects_bad_date() {
        let result = Settings::try_parse_from([
            "label-trends",
            "search",
            "--created-before",
            "not-a-date",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_components_subcommand() {
        let settings = Settings::parse_from(["label-trends", "components", "--project", "OPS"]);
        match settings.command {
            Command::Components { project } => assert_eq!(project, "OPS"),
            other => panic!("expected components, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_overrides_log_level() {
        let settings = Settings::load_from(["label-trends", "--debug", "query"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let settings = Settings::load_from([
            "label-trends",
            "query",
            "--log-level",
            "ERROR",
            "--log-file",
            "/tmp/trends.log",
        ]);
        assert_eq!(settings.log_level, "ERROR");
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/trends.log")));
    }

    // ── jira_config ───────────────────────────────────────────────────────────

    #[test]
    fn test_jira_config_complete() {
        let settings = settings_with_credentials(
            Some("https://example.atlassian.net"),
            Some("me@example.com"),
            Some("secret"),
        );
        let config = settings.jira_config().unwrap();
        assert_eq!(config.base_url, "https://example.atlassian.net");
        assert_eq!(config.user, "me@example.com");
        assert_eq!(config.api_token, "secret");
    }

    #[test]
    fn test_jira_config_names_missing_variable() {
        let settings = settings_with_credentials(Some("https://example.atlassian.net"), None, Some("secret"));
        let err = settings.jira_config().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: must set \"JIRA_USER\"");
    }

    #[test]
    fn test_jira_config_blank_counts_as_missing() {
        let settings = settings_with_credentials(Some("  "), Some("me"), Some("secret"));
        let err = settings.jira_config().unwrap_err();
        assert!(err.to_string().contains("JIRA_BASE_URL"));
    }
}
