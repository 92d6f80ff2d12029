//! Compiles a structured issue filter into a Jira JQL query string.

use std::sync::OnceLock;

use clap::Args;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::Day;
use crate::time_utils::parse_day;

// ── SearchParams ──────────────────────────────────────────────────────────────

/// Structured search filter plus output options.
///
/// Either the structured fields or `raw_query` is used, never both: a
/// non-empty `raw_query` wins and everything else is ignored.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Only issues carrying this label (repeatable)
    #[arg(long = "label", value_name = "LABEL")]
    #[serde(default)]
    pub labels: Vec<String>,

    /// Only issues in this component (repeatable)
    #[arg(long = "component", value_name = "COMPONENT")]
    #[serde(default)]
    pub components: Vec<String>,

    /// Project key
    #[arg(long)]
    pub project: Option<String>,

    /// Issue status
    #[arg(long)]
    pub status: Option<String>,

    /// Issue status category (e.g. "To Do", "Done")
    #[arg(long)]
    pub status_category: Option<String>,

    /// Issue type
    #[arg(long)]
    pub issue_type: Option<String>,

    /// Only issues created before this day (YYYY-M-D)
    #[arg(long, value_parser = parse_day)]
    pub created_before: Option<Day>,

    /// Only issues created after this day (YYYY-M-D)
    #[arg(long, value_parser = parse_day)]
    pub created_after: Option<Day>,

    /// Raw JQL; overrides every other filter
    #[arg(long)]
    pub raw_query: Option<String>,

    /// Collapse each label's series into a single total
    #[arg(long)]
    #[serde(default)]
    pub aggregate: bool,

    /// Indent the JSON output
    #[arg(long)]
    #[serde(default)]
    pub pretty: bool,
}

// ── Query construction ────────────────────────────────────────────────────────

/// Build the JQL query for `params`.
///
/// An empty filter compiles to an empty string, which Jira treats as
/// "every issue visible to the user".
pub fn query_for_params(params: &SearchParams) -> String {
    if let Some(raw) = non_empty(&params.raw_query) {
        return raw.to_string();
    }

    let mut builder = JqlBuilder::default();

    if let Some(project) = non_empty(&params.project) {
        builder.eq("project", project);
    }
    if let Some(issue_type) = non_empty(&params.issue_type) {
        builder.eq("issuetype", issue_type);
    }
    if let Some(status) = non_empty(&params.status) {
        builder.eq("status", status);
    }
    if let Some(category) = non_empty(&params.status_category) {
        builder.eq_quoted("statusCategory", category);
    }

    builder.eq_or_in("labels", &params.labels);
    builder.eq_or_in("component", &params.components);

    if let Some(after) = params.created_after {
        builder.compare("created", ">", after);
    }
    if let Some(before) = params.created_before {
        builder.compare("created", "<", before);
    }

    builder.build()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Accumulates `AND`-joined JQL clauses.
#[derive(Debug, Default)]
struct JqlBuilder {
    clauses: Vec<String>,
}

impl JqlBuilder {
    fn eq(&mut self, field: &str, value: &str) {
        self.clauses.push(format!("{} = {}", field, word(value)));
    }

    fn eq_quoted(&mut self, field: &str, value: &str) {
        self.clauses.push(format!("{} = {}", field, quote(value)));
    }

    /// One value compiles to equality, several to set membership.
    fn eq_or_in(&mut self, field: &str, values: &[String]) {
        match values {
            [] => {}
            [single] => self.eq(field, single),
            many => {
                let list: Vec<String> = many.iter().map(|v| word(v)).collect();
                self.clauses
                    .push(format!("{} in ({})", field, list.join(", ")));
            }
        }
    }

    fn compare(&mut self, field: &str, op: &str, day: Day) {
        let value = day.format("%Y-%m-%d").to_string();
        self.clauses
            .push(format!("{} {} {}", field, op, quote(&value)));
    }

    fn build(self) -> String {
        self.clauses.join(" AND ")
    }
}

/// Words JQL reserves; a value spelling one of them must be quoted.
///
/// Sorted for `binary_search`.
const RESERVED_WORDS: &[&str] = &[
    "a", "abort", "access", "add", "after", "alias", "all", "alter", "an", "and", "any", "are",
    "as", "asc", "at", "audit", "avg", "before", "begin", "between", "boolean", "break", "by",
    "byte", "catch", "cf", "char", "character", "check", "checkpoint", "collate", "collation",
    "column", "commit", "connect", "continue", "count", "create", "current", "date", "decimal",
    "declare", "decrement", "default", "defaults", "define", "delete", "delimiter", "desc",
    "difference", "distinct", "divide", "do", "double", "drop", "else", "empty", "encoding", "end",
    "equals", "escape", "exclusive", "exec", "execute", "exists", "explain", "false", "fetch",
    "field", "file", "first", "float", "for", "from", "function", "go", "goto", "grant", "greater",
    "group", "having", "identified", "if", "immediate", "in", "increment", "index", "initial",
    "inner", "inout", "input", "insert", "int", "integer", "intersect", "intersection", "into",
    "is", "isempty", "isnull", "join", "last", "left", "less", "like", "limit", "lock", "long",
    "max", "min", "minus", "mode", "modify", "modulo", "more", "multiply", "next", "noaudit", "not",
    "notin", "nowait", "null", "number", "object", "of", "on", "option", "or", "order", "outer",
    "output", "power", "previous", "prior", "privileges", "public", "raise", "raw", "remainder",
    "rename", "resource", "return", "returns", "revoke", "right", "row", "rowid", "rownum", "rows",
    "select", "session", "set", "share", "size", "sqrt", "start", "strict", "string", "subtract",
    "sum", "synonym", "table", "then", "to", "trans", "transaction", "trigger", "true", "uid",
    "union", "unique", "update", "user", "validate", "values", "view", "when", "whenever", "where",
    "while", "with",
];

/// Render a bare JQL word, quoting it when it contains anything beyond
/// letters, digits, `_`, `.` and `-`, or when it is a reserved word.
fn word(value: &str) -> String {
    static BARE_WORD: OnceLock<Regex> = OnceLock::new();
    let re = BARE_WORD.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("regex is valid"));

    if re.is_match(value) && !is_reserved(value) {
        value.to_string()
    } else {
        quote(value)
    }
}

fn is_reserved(value: &str) -> bool {
    RESERVED_WORDS
        .binary_search(&value.to_ascii_lowercase().as_str())
        .is_ok()
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}
