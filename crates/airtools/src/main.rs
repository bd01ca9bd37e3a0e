use crate::prelude::{eprintln, *};
use clap::Parser;

mod call;
mod config;
mod dispatcher;
mod error;
mod list;
mod prelude;
mod report;
mod resolve;
mod transport;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Command line access to the Binalyze AIR REST API"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// AIR instance URL (overrides AIR_INSTANCE_URL)
    #[clap(long, global = true)]
    instance_url: Option<String>,

    /// AIR API token (overrides AIR_API_TOKEN)
    #[clap(long, global = true)]
    token: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "AIRTOOLS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl Global {
    /// Build a dispatcher from the environment plus CLI overrides
    pub fn dispatcher(&self) -> Result<dispatcher::Dispatcher> {
        let config = config::AirConfig::from_env()
            .with_overrides(self.instance_url.clone(), self.token.clone());

        if self.verbose {
            eprintln!("Using configuration: {:?}", config);
        }

        let credentials = config.credentials()?;
        Ok(dispatcher::Dispatcher::new(credentials)?)
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommands {
    /// Organization operations
    #[clap(subcommand)]
    Organizations(list::Commands),

    /// Case operations
    #[clap(subcommand)]
    Cases(list::Commands),

    /// Asset operations
    #[clap(subcommand)]
    Assets(list::Commands),

    /// Task operations
    #[clap(subcommand)]
    Tasks(list::Commands),

    /// Baseline comparison reports
    #[clap(subcommand)]
    Report(report::Commands),

    /// Call any API operation directly
    Call(call::CallOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    use airtools_core::resources::Resource;
    match app.command {
        SubCommands::Organizations(cmd) => list::run(Resource::Organization, cmd, app.global).await,
        SubCommands::Cases(cmd) => list::run(Resource::Case, cmd, app.global).await,
        SubCommands::Assets(cmd) => list::run(Resource::Asset, cmd, app.global).await,
        SubCommands::Tasks(cmd) => list::run(Resource::Task, cmd, app.global).await,
        SubCommands::Report(cmd) => report::run(cmd, app.global).await,
        SubCommands::Call(options) => call::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
