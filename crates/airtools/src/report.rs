use airtools_core::reference::Reference;
use airtools_core::report::ComparisonReport;
use airtools_core::resources::Resource;

use crate::dispatcher::Dispatcher;
use crate::list::resolve_organization;
use crate::prelude::{eprintln, println, *};

/// Comparison report commands
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Fetch the baseline comparison report of an endpoint for a task
    #[clap(name = "get")]
    Get(ReportOptions),
}

/// Options for fetching a comparison report
#[derive(Debug, clap::Args, Clone)]
pub struct ReportOptions {
    /// Endpoint (asset) the report belongs to
    #[arg(long)]
    pub endpoint: String,

    /// How --endpoint is given: list, id or name
    #[arg(long, default_value = "id")]
    pub endpoint_by: String,

    /// Baseline comparison task
    #[arg(long)]
    pub task: String,

    /// How --task is given: list, id or name
    #[arg(long, default_value = "id")]
    pub task_by: String,

    /// Organization used to look up names
    #[arg(long, env = "AIR_ORGANIZATION")]
    pub organization: Option<String>,

    /// How --organization is given: list, id or name
    #[arg(long, default_value = "id")]
    pub organization_by: String,

    /// Print only the decoded report
    #[arg(long)]
    pub raw: bool,
}

/// Public data function - fetch and decode a comparison report
pub async fn comparison_report_data(
    dispatcher: &Dispatcher,
    options: &ReportOptions,
) -> Result<ComparisonReport> {
    let endpoint = Reference::parse(
        Resource::Asset.field(),
        &options.endpoint_by,
        &options.endpoint,
    )?;
    let task = Reference::parse(Resource::Task.field(), &options.task_by, &options.task)?;

    let organization_id = resolve_organization(
        dispatcher,
        options.organization.as_deref(),
        &options.organization_by,
    )
    .await
    .context("Failed to get comparison report")?;

    Ok(dispatcher
        .comparison_report(&endpoint, &task, organization_id.as_deref())
        .await?)
}

/// Module entry point
pub async fn run(cmd: Commands, global: crate::Global) -> Result<()> {
    let dispatcher = global.dispatcher()?;

    match cmd {
        Commands::Get(options) => {
            let report = comparison_report_data(&dispatcher, &options).await?;

            if global.verbose {
                eprintln!("{}", report.message);
            }

            let output = match (&report.report_json, options.raw) {
                (Some(json), true) => serde_json::to_string_pretty(json)?,
                _ => serde_json::to_string_pretty(&report)?,
            };
            println!("{output}");
        }
    }

    Ok(())
}
