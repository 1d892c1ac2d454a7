use crate::account::AccountContext;
use crate::api::{EntityRef, OperationKind};
use crate::config::CampaignConfig;
use crate::error::{FailedOperation, ProvisionError};

use super::classifier::Classification;
use super::provisioner::ProvisionState;
use super::report::{PhaseTally, ReportLine};

const OVERALL: &str = "Total";

/// Everything a run produced, complete or not.
///
/// Built up step by step by the provisioner and handed back to the caller on
/// both `Done` and `Aborted`.
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    pub account: AccountContext,
    pub campaign_name: String,
    pub ad_group_name: String,
    pub daily_budget: f64,
    pub budget_ref: Option<EntityRef>,
    pub campaign_ref: Option<EntityRef>,
    pub keywords_accepted: usize,
    pub keywords_rejected: usize,
    pub callouts_linked: usize,
    pub headlines: usize,
    pub descriptions: usize,
    pub phases: Vec<PhaseTally>,
    pub report: Vec<ReportLine>,
    pub state: ProvisionState,
    /// Step that was running when the run aborted
    pub failed_step: Option<String>,
}

impl ProvisionOutcome {
    pub fn new(account: &AccountContext, campaign: &CampaignConfig) -> Self {
        Self {
            account: account.clone(),
            campaign_name: campaign.name.clone(),
            ad_group_name: campaign.ad_group_name.clone(),
            daily_budget: campaign.daily_budget,
            budget_ref: None,
            campaign_ref: None,
            keywords_accepted: 0,
            keywords_rejected: 0,
            callouts_linked: 0,
            headlines: 0,
            descriptions: 0,
            phases: Vec::new(),
            report: Vec::new(),
            state: ProvisionState::Idle,
            failed_step: None,
        }
    }

    /// Record one classified operation under `phase`
    pub fn record(
        &mut self,
        phase: &str,
        label: &str,
        kind: OperationKind,
        classification: Classification,
    ) {
        let position = match self.phases.iter().position(|t| t.phase == phase) {
            Some(position) => position,
            None => {
                self.phases.push(PhaseTally::new(phase));
                self.phases.len() - 1
            }
        };
        self.phases[position].record(&classification);

        match (kind, &classification) {
            (OperationKind::Keyword, Classification::Success) => self.keywords_accepted += 1,
            (OperationKind::Keyword, Classification::Warning(_)) => self.keywords_rejected += 1,
            (OperationKind::CampaignAsset, Classification::Success) => self.callouts_linked += 1,
            _ => {}
        }

        self.report.push(ReportLine::new(label, classification));
    }

    pub fn warning_count(&self) -> usize {
        self.phases.iter().map(|t| t.warning).sum()
    }

    pub fn fatal_count(&self) -> usize {
        self.phases.iter().map(|t| t.fatal).sum()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ReportLine> {
        self.report.iter().filter(|line| line.classification.is_warning())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReportLine> {
        self.report.iter().filter(|line| line.classification.is_fatal())
    }

    /// Counts across every phase
    pub fn overall_tally(&self) -> PhaseTally {
        let mut overall = PhaseTally::new(OVERALL);
        for tally in &self.phases {
            overall.success += tally.success;
            overall.warning += tally.warning;
            overall.fatal += tally.fatal;
        }
        overall
    }

    /// Operation lines in submission order, one tally per phase, then the
    /// overall tally
    pub fn report_lines(&self) -> Vec<String> {
        self.report
            .iter()
            .map(ToString::to_string)
            .chain(self.phases.iter().map(ToString::to_string))
            .chain(std::iter::once(self.overall_tally().to_string()))
            .collect()
    }

    pub fn is_done(&self) -> bool {
        self.state == ProvisionState::Done
    }
}

/// A run that stopped before `Done`; the outcome holds whatever was committed
#[derive(Debug)]
pub struct Aborted {
    pub error: ProvisionError,
    pub outcome: ProvisionOutcome,
}

impl Aborted {
    /// Fatal Phase 2 operations, if that is why the run stopped
    pub fn failed_operations(&self) -> &[FailedOperation] {
        match &self.error {
            ProvisionError::BatchOperationFailure { failed } => failed,
            _ => &[],
        }
    }
}

impl std::fmt::Display for Aborted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome.failed_step {
            Some(step) => write!(f, "{} aborted: {}", step, self.error),
            None => write!(f, "aborted: {}", self.error),
        }
    }
}

impl std::error::Error for Aborted {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
