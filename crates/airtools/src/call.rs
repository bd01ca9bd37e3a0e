use airtools_core::pagination::extract_pagination;
use airtools_core::request::{Method, OperationRequest, QueryParams};
use serde_json::Value;

use crate::prelude::{eprintln, println, *};

/// Options for calling an API operation directly
#[derive(Debug, clap::Args, Clone)]
#[command(after_help = "EXAMPLES:
  # Fetch a case by id:
  airtools call GET /api/public/cases/C-2024-0001

  # List cases of two organizations (repeated keys are joined with commas):
  airtools call GET /api/public/cases --query filter[organizationIds]=0 --query filter[organizationIds]=4

  # Create a tag:
  airtools call POST /api/public/tags --body '{\"name\":\"triage\",\"organizationId\":0}'")]
pub struct CallOptions {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    pub method: String,

    /// API path, e.g. /api/public/cases
    pub path: String,

    /// Query parameter as key=value; may be repeated
    #[arg(short, long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,

    /// JSON request body
    #[arg(short, long)]
    pub body: Option<String>,

    /// Operation name used in error messages
    #[arg(long)]
    pub operation: Option<String>,
}

/// Build an operation request from command line options
pub fn build_request(options: &CallOptions) -> Result<OperationRequest> {
    let method = Method::parse(&options.method)
        .ok_or_else(|| eyre!("Unsupported HTTP method: {}", options.method))?;

    let query = options
        .query
        .iter()
        .try_fold(QueryParams::new(), |query, pair| {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| eyre!("Query parameter must be KEY=VALUE, got '{}'", pair))?;
            Ok::<_, color_eyre::eyre::Report>(query.push(key.trim(), value.trim()))
        })?;

    let mut request = OperationRequest::new(method, options.path.clone()).with_query(query);

    if let Some(body) = &options.body {
        let body: Value = serde_json::from_str(body).context("Request body is not valid JSON")?;
        request = request.with_body(body);
    }

    Ok(request)
}

/// Module entry point
pub async fn run(options: CallOptions, global: crate::Global) -> Result<()> {
    let request = build_request(&options)?;
    let operation = options
        .operation
        .clone()
        .unwrap_or_else(|| f!("{} {}", request.method(), request.path()));

    let dispatcher = global.dispatcher()?;
    let payload = dispatcher
        .call(&operation, &request)
        .await
        .into_result(&operation)?;

    if global.verbose {
        if let Some(info) = extract_pagination(&payload) {
            eprintln!(
                "Page {} of {} ({} entities)",
                info.current_page, info.total_page_count, info.total_entity_count
            );
        }
    }

    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}
