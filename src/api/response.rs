//! Mutate response adapter
//!
//! The only place that looks inside raw Google Ads JSON payloads. Everything
//! downstream works with [`OperationResult`] and [`ApiError`].

use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::operations::{ApiError, ErrorCategory, Operations, OperationResult};

/// Map an `errorCode` oneof key to its category
pub fn category_for(error_code_key: &str) -> ErrorCategory {
    match error_code_key {
        "policyViolationError" | "policyFindingError" | "policyValidationParameterError" => {
            ErrorCategory::Policy
        }
        "authenticationError" => ErrorCategory::Authentication,
        "authorizationError" => ErrorCategory::Authorization,
        "quotaError" => ErrorCategory::Quota,
        "internalError" => ErrorCategory::Internal,
        _ => ErrorCategory::Request,
    }
}

fn policy_message_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\bpolicy\b|policy[ _-]?(finding|violation)|prohibited content")
            .expect("policy pattern is valid")
    })
}

/// Whether an error should be treated as a content-compliance rejection.
///
/// The message is only consulted when the error carried no typed code.
pub fn is_policy_violation(error: &ApiError) -> bool {
    match error.category {
        ErrorCategory::Policy => true,
        ErrorCategory::Unknown => policy_message_pattern().is_match(&error.message),
        _ => false,
    }
}

/// Convert one `GoogleAdsError` object into an [`ApiError`]
pub fn parse_error(error: &Value) -> ApiError {
    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.trim().is_empty());

    let code = error
        .get("errorCode")
        .and_then(|c| c.as_object())
        .and_then(|c| c.iter().next());

    match (code, message) {
        (Some((key, value)), message) => ApiError::new(
            value.as_str().unwrap_or(key.as_str()),
            message.unwrap_or("Unknown error"),
            category_for(key),
        ),
        (None, Some(message)) => ApiError::new("UNKNOWN", message, ErrorCategory::Unknown),
        (None, None) => ApiError::unknown(),
    }
}

/// Index of the mutate operation an error belongs to, from its field path
fn operation_index(error: &Value) -> Option<usize> {
    error
        .get("location")?
        .get("fieldPathElements")?
        .as_array()?
        .iter()
        .find(|element| {
            element.get("fieldName").and_then(|f| f.as_str()) == Some("mutate_operations")
        })?
        .get("index")
        .and_then(|i| i.as_u64().or_else(|| i.as_str().and_then(|s| s.parse().ok())))
        .map(|i| i as usize)
}

/// Collect every `GoogleAdsError` from a status object's `details`
fn collect_errors(status: &Value) -> Vec<(Option<usize>, ApiError)> {
    let mut errors = Vec::new();

    if let Some(details) = status.get("details").and_then(|d| d.as_array()) {
        for detail in details {
            if let Some(items) = detail.get("errors").and_then(|e| e.as_array()) {
                for item in items {
                    errors.push((operation_index(item), parse_error(item)));
                }
            }
        }
    }

    if errors.is_empty() {
        if let Some(message) = status.get("message").and_then(|m| m.as_str()) {
            if !message.trim().is_empty() {
                errors.push((None, ApiError::new("UNKNOWN", message, ErrorCategory::Unknown)));
            }
        }
    }

    errors
}

/// Group errors by operation index, keeping the first error per operation
fn errors_by_index(errors: &[(Option<usize>, ApiError)]) -> HashMap<usize, ApiError> {
    let mut by_index = HashMap::new();
    for (index, error) in errors {
        if let Some(index) = index {
            by_index.entry(*index).or_insert_with(|| error.clone());
        }
    }
    by_index
}

/// Decode a successful (HTTP 2xx) mutate response into positional results.
///
/// With partial failure enabled, failed operations come back as empty objects
/// in `mutateOperationResponses` and their errors live in
/// `partialFailureError`.
pub fn parse_mutate_response(operations: &Operations, body: &Value) -> Vec<OperationResult> {
    let responses = body
        .get("mutateOperationResponses")
        .and_then(|r| r.as_array())
        .cloned()
        .unwrap_or_default();

    let errors = body
        .get("partialFailureError")
        .map(collect_errors)
        .unwrap_or_default();
    let by_index = errors_by_index(&errors);
    let fallback = errors.first().map(|(_, e)| e.clone());

    operations
        .iter()
        .enumerate()
        .map(|(index, labeled)| {
            if let Some(error) = by_index.get(&index) {
                return OperationResult::failure(error.clone());
            }

            let resource_name = responses
                .get(index)
                .and_then(|r| r.get(labeled.operation.kind().result_key()))
                .and_then(|r| r.get("resourceName"))
                .and_then(|n| n.as_str())
                .map(|n| n.to_string());

            match (resource_name, &fallback) {
                (Some(name), _) => OperationResult::success(Some(name)),
                // A missing or empty response slot next to an unlocated partial failure
                (None, Some(error))
                    if responses.get(index).is_none_or(is_empty_object) =>
                {
                    OperationResult::failure(error.clone())
                }
                (None, _) => OperationResult::success(None),
            }
        })
        .collect()
}

/// Decode a rejected (HTTP 4xx) mutate request.
///
/// Nothing was committed, so every operation fails: with its own error when
/// the payload locates one, otherwise with the first error of the request.
pub fn parse_rejected_request(operations: &Operations, body: &Value) -> Vec<OperationResult> {
    let status = body.get("error").unwrap_or(body);
    let errors = collect_errors(status);
    let by_index = errors_by_index(&errors);
    let first = errors
        .first()
        .map(|(_, e)| e.clone())
        .unwrap_or_else(ApiError::unknown);

    (0..operations.len())
        .map(|index| {
            OperationResult::failure(by_index.get(&index).cloned().unwrap_or_else(|| first.clone()))
        })
        .collect()
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(|o| o.is_empty())
}
