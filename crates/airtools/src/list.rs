use airtools_core::pagination::ListPage;
use airtools_core::reference::Reference;
use airtools_core::resources::{list_request, ListOptions, Resource};
use colored::Colorize;
use serde_json::Value;

use crate::dispatcher::Dispatcher;
use crate::prelude::{println, *};

/// Listing commands shared by organizations, cases, assets and tasks
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List entities, one page at a time
    #[clap(name = "list")]
    List(ListArgs),
}

/// Options for listing entities
#[derive(Debug, clap::Args, Clone)]
pub struct ListArgs {
    /// Organization the entities belong to (ignored for organizations)
    #[arg(long, env = "AIR_ORGANIZATION")]
    pub organization: Option<String>,

    /// How --organization is given: list, id or name
    #[arg(long, default_value = "id")]
    pub organization_by: String,

    /// Only return entities whose name matches
    #[arg(long)]
    pub name: Option<String>,

    /// Page number (1-indexed)
    #[arg(short, long)]
    pub page: Option<u64>,

    /// Number of entities per page
    #[arg(short = 's', long)]
    pub page_size: Option<u64>,

    /// Keep the sortable and filter descriptors in JSON output
    #[arg(long)]
    pub with_descriptors: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Resolve an optional organization reference given on the command line
pub async fn resolve_organization(
    dispatcher: &Dispatcher,
    organization: Option<&str>,
    mode: &str,
) -> Result<Option<String>> {
    let Some(value) = organization else {
        return Ok(None);
    };

    let field = Resource::Organization.field();
    let reference = Reference::parse(field, mode, value)?;
    let id = dispatcher
        .resolve(Resource::Organization, &reference, None)
        .await?;

    Ok(Some(id))
}

/// Public data function - fetch one page of a resource listing
pub async fn list_resource_data(
    dispatcher: &Dispatcher,
    resource: Resource,
    args: &ListArgs,
) -> Result<ListPage> {
    let operation = f!("list {}", resource.plural());

    let organization_id = if resource.scoped_to_organization() {
        resolve_organization(
            dispatcher,
            args.organization.as_deref(),
            &args.organization_by,
        )
        .await
        .with_context(|| f!("Failed to {operation}"))?
    } else {
        None
    };

    let request = list_request(
        resource,
        &ListOptions {
            organization_id,
            name: args.name.clone(),
            page_number: args.page,
            page_size: args.page_size,
        },
    );

    Ok(dispatcher
        .list(&operation, &request, !args.with_descriptors)
        .await?)
}

/// Module entry point
pub async fn run(resource: Resource, cmd: Commands, global: crate::Global) -> Result<()> {
    let dispatcher = global.dispatcher()?;

    match cmd {
        Commands::List(args) => {
            let page = list_resource_data(&dispatcher, resource, &args).await?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                display_page(resource, &page);
            }
        }
    }

    Ok(())
}

fn display_page(resource: Resource, page: &ListPage) {
    if page.entities.is_empty() {
        println!("No {} found.", resource.plural());
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["ID".bold().cyan(), "Name".bold().cyan()]);

    for entity in &page.entities {
        table.add_row(prettytable::row![
            display_field(entity, &["_id", "id"]).green(),
            display_field(entity, &["name"]).bright_white()
        ]);
    }

    table.printstd();

    if let Some(info) = &page.pagination {
        println!(
            "\nPage {} of {} ({} {} total)",
            info.current_page,
            info.total_page_count,
            info.total_entity_count,
            resource.plural()
        );
        if info.has_next_page() {
            let next = info.next_page.unwrap_or(info.current_page + 1);
            println!("{}", f!("Next page: --page {next}").bright_black());
        }
    }
}

fn display_field(entity: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| entity.get(*key))
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| "-".to_string())
}
