use log::debug;

use crate::api::response::is_policy_violation;
use crate::api::{OperationKind, OperationResult};

/// How a single operation result affects the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Success,
    /// Recoverable rejection, reported but not counted as a failure
    Warning(String),
    Fatal(String),
}

impl Classification {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// Error message for warnings and fatals
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Warning(reason) | Self::Fatal(reason) => Some(reason),
        }
    }
}

/// Classify one result.
///
/// Only keyword creates rejected for policy reasons are downgraded to a
/// warning; every other failure is fatal.
pub fn classify(label: &str, kind: OperationKind, result: &OperationResult) -> Classification {
    let Some(error) = result.error() else {
        return Classification::Success;
    };

    let message = if error.message.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        error.message.clone()
    };

    let classification = if kind == OperationKind::Keyword && is_policy_violation(error) {
        Classification::Warning(message)
    } else {
        Classification::Fatal(message)
    };

    debug!("{} classified as {:?} ({})", label, classification, error.code);
    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ErrorCategory};

    fn failure(message: &str, category: ErrorCategory) -> OperationResult {
        OperationResult::failure(ApiError::new("CODE", message, category))
    }

    #[test]
    fn test_success() {
        let result = OperationResult::success(Some("customers/1/adGroups/2".to_string()));
        assert_eq!(
            classify("Ad group: G", OperationKind::AdGroup, &result),
            Classification::Success
        );
    }

    #[test]
    fn test_keyword_policy_failure_is_warning() {
        let result = failure("The keyword violates a policy", ErrorCategory::Policy);
        let classification = classify("Keyword: casino", OperationKind::Keyword, &result);

        assert!(classification.is_warning());
        assert_eq!(classification.reason(), Some("The keyword violates a policy"));
    }

    #[test]
    fn test_policy_detected_from_message_alone() {
        let result = failure("A policy finding was detected.", ErrorCategory::Unknown);
        assert!(classify("Keyword: x", OperationKind::Keyword, &result).is_warning());
    }

    #[test]
    fn test_typed_request_error_mentioning_policy_is_fatal() {
        let result = failure("Text breaks the account naming policy.", ErrorCategory::Request);
        assert!(classify("Keyword: x", OperationKind::Keyword, &result).is_fatal());
    }

    #[test]
    fn test_keyword_non_policy_failure_is_fatal() {
        let result = failure("Resource was not found.", ErrorCategory::Request);
        assert!(classify("Keyword: x", OperationKind::Keyword, &result).is_fatal());
    }

    #[test]
    fn test_policy_failure_on_other_kinds_is_fatal() {
        let result = failure("Ad text violates a policy", ErrorCategory::Policy);
        assert!(classify("Ad: responsive search ad", OperationKind::AdGroupAd, &result).is_fatal());
    }

    #[test]
    fn test_unparseable_error_message() {
        let result = OperationResult::failure(ApiError::unknown());
        assert_eq!(
            classify("Callout asset: x", OperationKind::CalloutAsset, &result),
            Classification::Fatal("Unknown error".to_string())
        );
    }

    #[test]
    fn test_deterministic() {
        let result = failure("policy", ErrorCategory::Policy);
        let first = classify("Keyword: a", OperationKind::Keyword, &result);
        for _ in 0..5 {
            assert_eq!(classify("Keyword: a", OperationKind::Keyword, &result), first);
        }
    }
}
