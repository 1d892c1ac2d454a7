//! Provisioning error model
use thiserror::Error;

use crate::api::{ApiError, OperationKind};

/// A Phase 2 operation that was classified fatal
#[derive(Debug, Clone, PartialEq)]
pub struct FailedOperation {
    pub label: String,
    pub kind: OperationKind,
    pub error: ApiError,
}

#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Bad config file, unknown account, unreadable data source
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Sheet data out of bounds; carries every violation found
    #[error("validation failed:\n- {}", .0.join("\n- "))]
    Validation(Vec<String>),

    /// A Phase 1 single-operation submission was rejected
    #[error("{step} failed: {label}: {error}")]
    AtomicOperationFailure {
        step: String,
        label: String,
        error: ApiError,
    },

    /// A just-created entity could not be read back
    #[error("inconsistent state: {0}")]
    InconsistentState(String),

    #[error("{} operations failed", .failed.len())]
    BatchOperationFailure { failed: Vec<FailedOperation> },

    /// Provisional token used outside the submission that creates it
    #[error("invalid entity reference: {0}")]
    InvalidReference(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl ProvisionError {
    /// Short name of the failure class, used in reports and notifications
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "ConfigurationError",
            Self::Validation(_) => "ValidationError",
            Self::AtomicOperationFailure { .. } => "AtomicOperationFailure",
            Self::InconsistentState(_) => "InconsistentStateError",
            Self::BatchOperationFailure { .. } => "BatchOperationFailure",
            Self::InvalidReference(_) => "InvalidReference",
            Self::Transport(_) => "TransportError",
        }
    }

    /// Whether the failure happened before anything was sent to the API
    pub fn is_pre_mutation(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::Validation(_) | Self::InvalidReference(_)
        )
    }

    pub fn transport(error: anyhow::Error) -> Self {
        Self::Transport(format!("{:#}", error))
    }
}

/// Failure of a name-based lookup
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("no {kind} named '{name}' found")]
    NotFound { kind: String, name: String },

    #[error("lookup failed: {0:#}")]
    Transport(anyhow::Error),
}

impl From<LookupError> for ProvisionError {
    fn from(error: LookupError) -> Self {
        match error {
            LookupError::NotFound { kind, name } => {
                Self::InconsistentState(format!("{} '{}' not found after creation", kind, name))
            }
            LookupError::Transport(e) => Self::transport(e),
        }
    }
}
