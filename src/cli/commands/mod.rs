pub mod init;
pub mod plan;
pub mod run;
pub mod validate;

pub use init::init_command;
pub use plan::plan_command;
pub use run::run_command;
pub use validate::validate_command;

use colored::*;

use crate::provision::{Classification, ProvisionOutcome, ReportLine};

/// Print a report line colored by its classification
pub fn print_report_line(line: &ReportLine) {
    let text = line.to_string();
    match line.classification {
        Classification::Success => println!("  {} {}", "✓".bright_green(), text),
        Classification::Warning(_) => println!("  {} {}", "⚠".bright_yellow(), text.yellow()),
        Classification::Fatal(_) => println!("  {} {}", "✗".bright_red(), text.red()),
    }
}

pub fn print_report(outcome: &ProvisionOutcome) {
    for line in &outcome.report {
        print_report_line(line);
    }
    println!();
    for tally in &outcome.phases {
        println!("  {}", tally.to_string().bright_white().bold());
    }
    println!("  {}", outcome.overall_tally().to_string().bright_white().bold());
}

/// Print violation messages, one per line
pub fn print_violations(violations: &[String]) {
    println!("{}", "Validation failed:".bright_red().bold());
    for violation in violations {
        println!("  {} {}", "•".bright_red(), violation);
    }
}
