mod commands;
mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stevedore", about = "Sequence Docker image builds and ECS updates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the deploy pipeline from a config file
    Deploy {
        /// Pipeline config path
        #[arg(long, default_value = "stevedore.toml")]
        config: PathBuf,
        /// Skip registry authentication before the pipeline runs
        #[arg(long)]
        skip_login: bool,
    },
    /// Authenticate the local Docker daemon against ECR
    Login,
    /// Check the aws CLI, credentials, and the Docker daemon
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy { config, skip_login } => commands::deploy(&config, skip_login).await?,
        Commands::Login => commands::login().await?,
        Commands::Doctor => commands::doctor().await?,
    }

    Ok(())
}
