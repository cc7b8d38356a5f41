use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use grafana_tool::app::export_use_case::{resolve_folder_id, ExportDashboardsUseCase, ExportRequest};
use grafana_tool::config::{Config, GrafanaConfig};
use grafana_tool::constants::{ENV_API_TOKEN, ENV_PASSWORD, ENV_URL, ENV_USERNAME};
use grafana_tool::grafana::{GrafanaClient, SearchQuery};
use grafana_tool::infra::fs_sink::FsDashboardSink;
use grafana_tool::logging;

#[derive(Parser)]
#[command(name = "grafana-tool")]
#[command(about = "Export Grafana dashboards to a local file tree")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Config file with a [grafana] table (defaults to grafana-tool.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write JSON logs to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Grafana base URL, e.g. https://grafana.example.com
    #[arg(long, env = ENV_URL, global = true)]
    url: Option<String>,

    /// API token sent as a bearer token
    #[arg(long, env = ENV_API_TOKEN, global = true, hide_env_values = true)]
    token: Option<String>,

    /// Username for basic auth; takes precedence over the token
    #[arg(long, env = ENV_USERNAME, global = true)]
    username: Option<String>,

    #[arg(long, env = ENV_PASSWORD, global = true, hide_env_values = true)]
    password: Option<String>,
}

impl From<ConnectionArgs> for GrafanaConfig {
    fn from(args: ConnectionArgs) -> Self {
        GrafanaConfig {
            url: args.url,
            api_token: args.token,
            username: args.username,
            password: args.password,
            timeout_seconds: None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Dashboard commands
    Dashboard {
        #[command(subcommand)]
        command: DashboardCommands,
    },
    /// Folder commands
    Folder {
        #[command(subcommand)]
        command: FolderCommands,
    },
}

#[derive(Subcommand)]
enum DashboardCommands {
    /// Exports all dashboards, or those of one Grafana folder
    Export {
        /// Path to save dashboards
        #[arg(short, long)]
        path: PathBuf,
        /// Grafana folder name. Dashboards of this folder will be exported
        #[arg(short, long)]
        folder: Option<String>,
    },
    /// Lists dashboards matching the filters
    List {
        #[arg(short, long)]
        folder: Option<String>,
        /// Free-text search on the title
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[derive(Subcommand)]
enum FolderCommands {
    /// Lists all folders
    List,
}

fn build_client(config_path: Option<&PathBuf>, connection: ConnectionArgs) -> Result<GrafanaClient> {
    let config = Config::load(config_path.map(|p| p.as_path()))?;
    let settings = config
        .grafana
        .merge(connection.into())
        .into_settings()
        .context("Incomplete Grafana connection settings")?;
    Ok(GrafanaClient::new(settings)?)
}

async fn run(cli: Cli) -> Result<()> {
    let client = build_client(cli.config.as_ref(), cli.connection)?;

    match cli.command {
        Commands::Dashboard { command: DashboardCommands::Export { path, folder } } => {
            let use_case = ExportDashboardsUseCase::new(Box::new(client), Box::new(FsDashboardSink));
            let report = use_case
                .run(&ExportRequest { output_dir: path, folder })
                .await
                .context("Dashboard export failed")?;
            info!("Exported {} dashboards", report.written.len());
        }
        Commands::Dashboard { command: DashboardCommands::List { folder, query } } => {
            let folder_id = resolve_folder_id(&client, folder.as_deref()).await?;
            let hits = client
                .search_dashboards(&SearchQuery::dashboards().in_folder(folder_id).matching(query))
                .await?;
            for hit in hits {
                println!(
                    "{}\t{}\t{}",
                    hit.uid,
                    hit.folder_title.as_deref().unwrap_or("General"),
                    hit.title
                );
            }
        }
        Commands::Folder { command: FolderCommands::List } => {
            let folders = client.get_folders().await?;
            for folder in folders.iter() {
                println!("{}\t{}\t{}", folder.id, folder.uid, folder.title);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let _guard = logging::init_logging(cli.log_dir.as_deref(), cli.verbose)
        .context("Failed to initialize logging")?;

    let result = run(cli).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
