//! Two-phase campaign provisioning state machine

use log::{error, info, warn};
use std::fmt;

use crate::account::AccountContext;
use crate::api::{ApiError, MutationApi, OperationKind, OperationResult, Operations, ProvisionalTokens};
use crate::config::Config;
use crate::error::{FailedOperation, ProvisionError};
use crate::sheet::{self, SheetData};

use super::builder::OperationBuilder;
use super::classifier::{Classification, classify};
use super::executor::{BatchExecutor, CommitMode};
use super::lookup::ResolutionLookup;
use super::outcome::{Aborted, ProvisionOutcome};

pub const PHASE_1: &str = "Phase 1";
pub const PHASE_2: &str = "Phase 2";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionState {
    Idle,
    Phase1Budget,
    Phase1Campaign,
    ResolvingCampaignRef,
    Phase2Submit,
    Classifying,
    Done,
    Aborted,
}

impl ProvisionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Forward edges of the run plus `Aborted` from any live state
    pub fn can_transition_to(&self, next: ProvisionState) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == Self::Aborted {
            return true;
        }

        matches!(
            (self, next),
            (Self::Idle, Self::Phase1Budget)
                | (Self::Phase1Budget, Self::Phase1Campaign)
                | (Self::Phase1Campaign, Self::ResolvingCampaignRef)
                | (Self::ResolvingCampaignRef, Self::Phase2Submit)
                | (Self::Phase2Submit, Self::Classifying)
                | (Self::Classifying, Self::Done)
        )
    }

    /// What the run was doing while in this state
    pub fn step(&self) -> &'static str {
        match self {
            Self::Idle => "validation",
            Self::Phase1Budget => "budget creation",
            Self::Phase1Campaign => "campaign creation",
            Self::ResolvingCampaignRef => "campaign lookup",
            Self::Phase2Submit => "phase 2 submission",
            Self::Classifying => "phase 2",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for ProvisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Creates one paused search campaign with its ad group, keywords, ad and
/// callouts in a client account.
///
/// Single use: [`run`](Self::run) consumes the provisioner. Steps are strictly
/// sequential and nothing is rolled back when a later step fails.
pub struct CampaignProvisioner<'a> {
    api: &'a dyn MutationApi,
    account: AccountContext,
    config: &'a Config,
    tokens: ProvisionalTokens,
    state: ProvisionState,
    outcome: ProvisionOutcome,
}

impl<'a> CampaignProvisioner<'a> {
    pub fn new(api: &'a dyn MutationApi, account: AccountContext, config: &'a Config) -> Self {
        let outcome = ProvisionOutcome::new(&account, &config.campaign);
        Self {
            api,
            account,
            config,
            tokens: ProvisionalTokens::new(),
            state: ProvisionState::Idle,
            outcome,
        }
    }

    pub fn state(&self) -> ProvisionState {
        self.state
    }

    pub async fn run(mut self, sheet: &SheetData) -> Result<ProvisionOutcome, Aborted> {
        info!(
            "Provisioning campaign '{}' in {}",
            self.config.campaign.name, self.account
        );

        match self.execute(sheet).await {
            Ok(()) => {
                self.state = ProvisionState::Done;
                self.outcome.state = ProvisionState::Done;
                info!(
                    "Campaign '{}' provisioned with {} warnings",
                    self.outcome.campaign_name,
                    self.outcome.warning_count()
                );
                Ok(self.outcome)
            }
            Err(err) => {
                let step = self.state.step();
                error!("Provisioning aborted during {}: {}", step, err);
                self.state = ProvisionState::Aborted;
                self.outcome.state = ProvisionState::Aborted;
                self.outcome.failed_step = Some(step.to_string());
                Err(Aborted {
                    error: err,
                    outcome: self.outcome,
                })
            }
        }
    }

    async fn execute(&mut self, sheet: &SheetData) -> Result<(), ProvisionError> {
        let api = self.api;
        let config = self.config;
        let account = self.account.clone();

        sheet::validate(sheet, &config.sheet.columns)?;
        self.outcome.headlines = sheet.headlines.len();
        self.outcome.descriptions = sheet.descriptions.len();

        let builder = OperationBuilder::new(&config.campaign);
        let mut executor = BatchExecutor::new(api, &account);
        let lookup = ResolutionLookup::new(api, &account);

        // Phase 1: budget, then the campaign that spends it
        self.transition(ProvisionState::Phase1Budget)?;
        let mut phase1 = builder.build_phase1(&mut self.tokens);
        let budget_ops = phase1
            .take(0)
            .ok_or_else(|| ProvisionError::InconsistentState("no budget operation built".into()))?;
        let budget_token = budget_ops
            .get(0)
            .and_then(|l| l.operation.created_ref())
            .ok_or_else(|| ProvisionError::InconsistentState("budget has no id".into()))?;

        let budget_result = self.submit_single(&mut executor, &budget_ops).await?;
        let budget_ref = match budget_result.durable_ref() {
            Some(durable) => durable,
            None => {
                warn!("Budget create returned no resource name, looking it up by name");
                lookup
                    .find_durable_ref(OperationKind::CampaignBudget, &config.campaign.budget_name())
                    .await?
            }
        };
        self.outcome.budget_ref = Some(budget_ref);

        self.transition(ProvisionState::Phase1Campaign)?;
        let campaign_ops = phase1.rebind(budget_token, budget_ref);
        let campaign_result = self.submit_single(&mut executor, &campaign_ops).await?;

        // Read the campaign back before anything is attached to it
        self.transition(ProvisionState::ResolvingCampaignRef)?;
        let found = lookup
            .find_durable_ref(OperationKind::Campaign, &config.campaign.name)
            .await?;
        let campaign_ref = match campaign_result.durable_ref() {
            Some(created) if created != found => {
                warn!(
                    "Lookup for '{}' returned {} but the create returned {}; using the latter",
                    config.campaign.name, found, created
                );
                created
            }
            _ => found,
        };
        self.outcome.campaign_ref = Some(campaign_ref);

        // Phase 2: everything else, one non-atomic batch
        self.transition(ProvisionState::Phase2Submit)?;
        let ad_group = self.tokens.next();
        let phase2 = builder.build_phase2(campaign_ref, ad_group, sheet, &mut self.tokens);
        let results = match executor.submit(&phase2, CommitMode::PartialFailure).await {
            Ok(results) => results,
            Err(err) => {
                self.record_unsent(PHASE_2, &phase2, &err);
                return Err(err);
            }
        };

        self.transition(ProvisionState::Classifying)?;
        let failed = self.classify_phase2(&phase2, &results);

        if failed.is_empty() {
            Ok(())
        } else {
            Err(ProvisionError::BatchOperationFailure { failed })
        }
    }

    /// Submit a one-operation list atomically and record its report line
    async fn submit_single(
        &mut self,
        executor: &mut BatchExecutor<'_>,
        operations: &Operations,
    ) -> Result<OperationResult, ProvisionError> {
        let labeled = operations
            .get(0)
            .ok_or_else(|| ProvisionError::InconsistentState("empty submission".into()))?;
        let kind = labeled.operation.kind();

        match executor.submit(operations, CommitMode::Atomic).await {
            Ok(mut results) => {
                self.outcome
                    .record(PHASE_1, &labeled.label, kind, Classification::Success);
                results
                    .pop()
                    .ok_or_else(|| ProvisionError::Transport("empty result list".into()))
            }
            Err(err) => {
                match &err {
                    ProvisionError::AtomicOperationFailure { error, .. } => self.outcome.record(
                        PHASE_1,
                        &labeled.label,
                        kind,
                        Classification::Fatal(error.message.clone()),
                    ),
                    other => self.record_unsent(PHASE_1, operations, other),
                }
                Err(err)
            }
        }
    }

    /// Mark every operation of a submission that produced no results as failed
    fn record_unsent(&mut self, phase: &str, operations: &Operations, err: &ProvisionError) {
        for labeled in operations {
            self.outcome.record(
                phase,
                &labeled.label,
                labeled.operation.kind(),
                Classification::Fatal(err.to_string()),
            );
        }
    }

    fn classify_phase2(
        &mut self,
        operations: &Operations,
        results: &[OperationResult],
    ) -> Vec<FailedOperation> {
        let mut failed = Vec::new();

        for (labeled, result) in operations.iter().zip(results) {
            let kind = labeled.operation.kind();
            let classification = classify(&labeled.label, kind, result);

            match &classification {
                Classification::Success => {}
                Classification::Warning(reason) => {
                    warn!("{}: WARN - {}", labeled.label, reason);
                }
                Classification::Fatal(reason) => {
                    error!("{}: FAIL - {}", labeled.label, reason);
                    failed.push(FailedOperation {
                        label: labeled.label.clone(),
                        kind,
                        error: result.error().cloned().unwrap_or_else(ApiError::unknown),
                    });
                }
            }

            self.outcome
                .record(PHASE_2, &labeled.label, kind, classification);
        }

        failed
    }

    fn transition(&mut self, next: ProvisionState) -> Result<(), ProvisionError> {
        if !self.state.can_transition_to(next) {
            return Err(ProvisionError::InconsistentState(format!(
                "illegal transition {} -> {}",
                self.state, next
            )));
        }
        info!("{} -> {}", self.state, next);
        self.state = next;
        self.outcome.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ProvisionState::*;

    #[test]
    fn test_forward_path() {
        let path = [
            Idle,
            Phase1Budget,
            Phase1Campaign,
            ResolvingCampaignRef,
            Phase2Submit,
            Classifying,
            Done,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_abort_from_any_live_state() {
        for state in [Idle, Phase1Budget, Phase1Campaign, ResolvingCampaignRef, Phase2Submit, Classifying] {
            assert!(state.can_transition_to(Aborted));
        }
        assert!(!Done.can_transition_to(Aborted));
        assert!(!Aborted.can_transition_to(Idle));
    }

    #[test]
    fn test_no_skipping_steps() {
        assert!(!Idle.can_transition_to(Phase2Submit));
        assert!(!Phase1Budget.can_transition_to(ResolvingCampaignRef));
        assert!(!Phase2Submit.can_transition_to(Done));
    }
}
