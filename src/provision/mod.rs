//! Campaign provisioning
//!
//! Phase 1 commits the budget and then the campaign, each in its own atomic
//! submission. Once the campaign's durable id is known, Phase 2 sends
//! targeting, the ad group, keywords, the ad and callouts as one
//! partial-failure batch whose results are classified one by one.

pub mod builder;
pub mod classifier;
pub mod executor;
pub mod lookup;
pub mod outcome;
pub mod provisioner;
pub mod report;

pub use builder::OperationBuilder;
pub use classifier::{Classification, classify};
pub use executor::{BatchExecutor, CommitMode};
pub use lookup::ResolutionLookup;
pub use outcome::{Aborted, ProvisionOutcome};
pub use provisioner::{CampaignProvisioner, ProvisionState};
pub use report::{PhaseTally, ReportLine};
