use anyhow::Result;
use colored::*;
use log::info;
use std::path::Path;

use crate::config::Config;
use crate::error::ProvisionError;
use crate::sheet::{self, SheetData};

use super::print_violations;

/// Read and validate the configured sheet; `Ok(false)` when it is invalid
pub async fn validate_command(config_path: Option<&Path>) -> Result<bool> {
    info!("Executing validate command");

    let config = Config::load(config_path)?;
    config.validate()?;

    println!("Reading {}...", config.sheet.source.bright_yellow());
    let data = SheetData::load(&config.sheet).await?;

    println!("  Keywords:     {}", data.keywords.len());
    println!("  Headlines:    {}", data.headlines.len());
    println!("  Descriptions: {}", data.descriptions.len());
    println!("  Callouts:     {}", data.callouts.len());
    println!();

    match sheet::validate(&data, &config.sheet.columns) {
        Ok(()) => {
            println!("{} Sheet is valid", "✓".bright_green().bold());
            Ok(true)
        }
        Err(ProvisionError::Validation(violations)) => {
            print_violations(&violations);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
