mod bootstrap;
mod output;

use std::io::Write;

use anyhow::Result;
use trends_core::query::query_for_params;
use trends_core::settings::{Command, SearchArgs, Settings};
use trends_core::time_utils::parse_timezone;
use trends_runtime::jira_client::JiraClient;
use trends_runtime::search_service::SearchService;
use trends_runtime::source::{DumpSource, IssueSource};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Label Trends v{} starting", env!("CARGO_PKG_VERSION"));

    match &settings.command {
        Command::Search(args) => {
            // Ctrl+C abandons the in-flight fetch; nothing is printed.
            tokio::select! {
                result = run_search(&settings, args) => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; search abandoned");
                }
            }
        }

        Command::Components { project } => {
            let client = JiraClient::new(&settings.jira_config()?)?;
            let names = client.list_components(project).await?;
            print(&output::render_json(&names, false)?)?;
        }

        Command::Query { params } => {
            print(&format!("{}\n", query_for_params(params)))?;
        }
    }

    Ok(())
}

/// Build the issue source for `args` and print the search result.
async fn run_search(settings: &Settings, args: &SearchArgs) -> Result<()> {
    let timezone = args.timezone.as_deref().map(parse_timezone).transpose()?;

    let source: Box<dyn IssueSource> = match &args.input {
        Some(path) => Box::new(DumpSource::new(path)),
        None => Box::new(JiraClient::new(&settings.jira_config()?)?.with_page_size(args.page_size)),
    };

    let service = SearchService::new(source, timezone);
    let outcome = service.run(&args.params).await?;

    print(&output::render_json(&outcome, args.params.pretty)?)
}

fn print(rendered: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
