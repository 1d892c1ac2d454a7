use anyhow::Result;
use colored::*;
use log::info;
use std::path::Path;

use crate::api::constants::env;
use crate::config::Config;

/// Write the config template to `config_path` or the default location
pub async fn init_command(config_path: Option<&Path>) -> Result<bool> {
    info!("Executing init command");

    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::get_config_path()?,
    };

    Config::write_template(&path)?;

    println!(
        "{} Config template written to {}",
        "✓".bright_green().bold(),
        path.display().to_string().bright_yellow()
    );
    println!();
    println!("Edit the [account], [sheet] and [campaign] sections, then set the API credentials");
    println!("in the environment or a .env file:");
    println!("  {}", env::DEVELOPER_TOKEN);
    println!("  {}", env::CLIENT_ID);
    println!("  {}", env::CLIENT_SECRET);
    println!("  {}", env::REFRESH_TOKEN);
    println!("  {} (optional, manager account)", env::LOGIN_CUSTOMER_ID);
    println!();
    println!("Check the sheet with 'search-campaign-cli validate' before running.");
    Ok(true)
}
