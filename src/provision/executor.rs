use log::{debug, info, warn};
use std::collections::HashSet;

use crate::account::AccountContext;
use crate::api::{ApiError, EntityRef, MutationApi, OperationResult, Operations};
use crate::error::ProvisionError;

/// Whether a submission commits all-or-nothing or per operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMode {
    Atomic,
    PartialFailure,
}

/// Submits operation lists to the mutation API for one account.
///
/// Remembers every provisional token it has sent so a later submission
/// cannot reuse or point at one of them.
pub struct BatchExecutor<'a> {
    api: &'a dyn MutationApi,
    account: &'a AccountContext,
    submitted: HashSet<EntityRef>,
}

impl<'a> BatchExecutor<'a> {
    pub fn new(api: &'a dyn MutationApi, account: &'a AccountContext) -> Self {
        Self {
            api,
            account,
            submitted: HashSet::new(),
        }
    }

    /// Submit `operations` and return one result per operation, in order.
    ///
    /// In [`CommitMode::Atomic`] any failed operation turns into
    /// [`ProvisionError::AtomicOperationFailure`].
    pub async fn submit(
        &mut self,
        operations: &Operations,
        mode: CommitMode,
    ) -> Result<Vec<OperationResult>, ProvisionError> {
        operations
            .check_references(&self.submitted)
            .map_err(ProvisionError::InvalidReference)?;

        info!(
            "Submitting {} operations to {} ({:?})",
            operations.len(),
            self.account.customer_id,
            mode
        );

        let atomic = mode == CommitMode::Atomic;
        let result = self
            .api
            .mutate(&self.account.customer_id, operations, atomic)
            .await;

        // Tokens are spent once sent, whatever the server made of them
        self.submitted.extend(operations.created_tokens());

        let results = result.map_err(ProvisionError::transport)?;

        if results.len() != operations.len() {
            return Err(ProvisionError::Transport(format!(
                "expected {} results, got {}",
                operations.len(),
                results.len()
            )));
        }

        let failures = results.iter().filter(|r| r.is_error()).count();
        debug!(
            "Submission finished: {} succeeded, {} failed",
            results.len() - failures,
            failures
        );

        if atomic && failures > 0 {
            return Err(atomic_failure(operations, &results));
        }

        Ok(results)
    }
}

/// Error for a rejected atomic submission, naming the operation at fault
fn atomic_failure(operations: &Operations, results: &[OperationResult]) -> ProvisionError {
    // Prefer an operation with a real error over ones only marked unknown
    // because the request as a whole was rolled back
    let failed = operations
        .iter()
        .zip(results)
        .filter_map(|(labeled, result)| result.error().map(|error| (labeled, error)));

    let mut first: Option<(&str, String, ApiError)> = None;
    for (labeled, error) in failed {
        let kind = labeled.operation.kind();
        let candidate = (
            labeled.label.as_str(),
            format!("{} creation", kind.as_str()),
            error.clone(),
        );
        if *error != ApiError::unknown() {
            first = Some(candidate);
            break;
        }
        first.get_or_insert(candidate);
    }

    match first {
        Some((label, step, error)) => {
            warn!("{} failed: {}: {}", step, label, error);
            ProvisionError::AtomicOperationFailure {
                step,
                label: label.to_string(),
                error,
            }
        }
        None => ProvisionError::Transport("atomic submission reported no failure".to_string()),
    }
}
