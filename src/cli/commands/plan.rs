use anyhow::{Context, Result};
use colored::*;
use log::info;
use std::path::Path;

use crate::api::{EntityRef, Operations, ProvisionalTokens};
use crate::cli::app::PlanArgs;
use crate::config::Config;
use crate::error::ProvisionError;
use crate::provision::OperationBuilder;
use crate::sheet::{self, SheetData};

use super::print_violations;

/// Print both phases' operations without contacting the API.
///
/// Phase 2 is shown against the campaign's provisional id; a real run uses
/// the durable id read back after Phase 1.
pub async fn plan_command(config_path: Option<&Path>, args: PlanArgs) -> Result<bool> {
    info!("Executing plan command");

    let config = Config::load(config_path)?;
    config.validate()?;
    let data = SheetData::load(&config.sheet).await?;

    if let Err(err) = sheet::validate(&data, &config.sheet.columns) {
        if let ProvisionError::Validation(violations) = &err {
            print_violations(violations);
            return Ok(false);
        }
        return Err(err.into());
    }

    let customer_id = config.customer_id();
    let builder = OperationBuilder::new(&config.campaign);
    let mut tokens = ProvisionalTokens::new();

    let phase1 = builder.build_phase1(&mut tokens);
    let campaign_placeholder = phase1
        .get(1)
        .and_then(|l| l.operation.created_ref())
        .unwrap_or(EntityRef::Provisional(0));
    let ad_group = tokens.next();
    let phase2 = builder.build_phase2(campaign_placeholder, ad_group, &data, &mut tokens);

    println!(
        "{} {} in account {}",
        "Plan for".bright_white().bold(),
        config.campaign.name.bright_yellow().bold(),
        customer_id
    );
    println!();

    print_phase(
        "Phase 1 (two atomic submissions)",
        &phase1,
        &customer_id,
        args.json,
    )?;
    print_phase(
        "Phase 2 (one partial-failure batch)",
        &phase2,
        &customer_id,
        args.json,
    )?;

    println!(
        "{} operations in total. The campaign will be created {}.",
        phase1.len() + phase2.len(),
        "PAUSED".bright_yellow().bold()
    );
    Ok(true)
}

fn print_phase(title: &str, operations: &Operations, customer_id: &str, json: bool) -> Result<()> {
    println!("{}", title.bright_blue().bold());
    for (index, labeled) in operations.iter().enumerate() {
        println!("  {:>3}. {}", index + 1, labeled.label);
        if json {
            let payload = serde_json::to_string_pretty(&labeled.operation.to_mutate_operation(customer_id))
                .context("Failed to render operation payload")?;
            for line in payload.lines() {
                println!("       {}", line.dimmed());
            }
        }
    }
    println!();
    Ok(())
}
