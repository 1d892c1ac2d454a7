use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "search-campaign-cli")]
#[command(about = "Create paused Google Ads search campaigns from a spreadsheet")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the campaign described by the config and sheet
    Run(RunArgs),
    /// Read and validate the sheet without touching the account
    Validate,
    /// Show the operations a run would submit, without any API call
    Plan(PlanArgs),
    /// Write a commented config template
    Init,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug, Default)]
pub struct PlanArgs {
    /// Also print each operation's request payload
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_global_config() {
        let cli = Cli::try_parse_from(["search-campaign-cli", "run", "--yes", "--config", "c.toml"])
            .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        match cli.command {
            Commands::Run(args) => assert!(args.yes),
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_plan_json() {
        let cli = Cli::try_parse_from(["search-campaign-cli", "plan", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Plan(PlanArgs { json: true })));
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["search-campaign-cli"]).is_err());
    }
}
