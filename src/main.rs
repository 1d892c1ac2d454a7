use anyhow::Result;
use clap::Parser;
use log::info;

use search_campaign_cli::cli::commands::{init_command, plan_command, run_command, validate_command};
use search_campaign_cli::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("search-campaign-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting search-campaign-cli");

    let config_path = cli.config.as_deref();
    let succeeded = match cli.command {
        Commands::Run(args) => run_command(config_path, args).await?,
        Commands::Validate => validate_command(config_path).await?,
        Commands::Plan(args) => plan_command(config_path, args).await?,
        Commands::Init => init_command(config_path).await?,
    };

    if !succeeded {
        std::process::exit(1);
    }

    Ok(())
}
