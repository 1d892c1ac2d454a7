//! Per-operation outcomes returned by the mutate endpoint

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity_ref::EntityRef;

/// Broad family of an API error, derived from its error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Content-compliance rejection (policy violation / policy finding)
    Policy,
    Authentication,
    Authorization,
    Quota,
    Internal,
    /// Malformed or invalid request field
    Request,
    /// Payload could not be interpreted
    Unknown,
}

/// Typed error for a single failed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code, e.g. `POLICY_FINDING` or `DUPLICATE_CAMPAIGN_NAME`
    pub code: String,
    pub message: String,
    pub category: ErrorCategory,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>, category: ErrorCategory) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            category,
        }
    }

    /// Placeholder for payloads nothing useful could be extracted from
    pub fn unknown() -> Self {
        Self::new("UNKNOWN", "Unknown error", ErrorCategory::Unknown)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Result of one submitted operation, positionally aligned with the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OperationResult {
    Success {
        /// Resource name of the created entity when the API returned one
        resource_name: Option<String>,
    },
    Failure {
        error: ApiError,
    },
}

impl OperationResult {
    pub fn success(resource_name: Option<String>) -> Self {
        Self::Success { resource_name }
    }

    pub fn failure(error: ApiError) -> Self {
        Self::Failure { error }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    pub fn resource_name(&self) -> Option<&str> {
        match self {
            Self::Success { resource_name } => resource_name.as_deref(),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    /// Durable id of the created entity, if the response carried one
    pub fn durable_ref(&self) -> Option<EntityRef> {
        self.resource_name()
            .and_then(EntityRef::from_resource_name)
            .filter(EntityRef::is_durable)
    }
}
