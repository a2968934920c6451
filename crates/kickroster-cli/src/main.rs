mod resolve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "kickroster-cli")]
#[command(about = "Resolve Kick channel profiles from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve one or more channels and print each result as JSON
    Resolve {
        /// Channel slugs or channel URLs
        #[arg(required = true)]
        users: Vec<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the configured player roster, one slug per line
    Players {
        /// Roster YAML file; overrides `KICKROSTER_PLAYERS_PATH`
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = kickroster_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve { users, pretty } => resolve::run_resolve(&config, &users, pretty).await,
        Commands::Players { file } => {
            let path = file.or_else(|| config.players_path.clone());
            for slug in kickroster_core::resolve_roster(path.as_deref())? {
                println!("{slug}");
            }
            Ok(())
        }
    }
}
