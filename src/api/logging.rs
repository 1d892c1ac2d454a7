//! Structured logging with correlation tracking for Google Ads API calls
//!
//! Every mutate or search call gets a correlation id so the request, the
//! response and the per-operation outcome can be matched up in the log file.

use log::{LevelFilter, debug, error, info, warn};
use serde_json::json;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Monitoring and logging configuration
#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    pub request_logging: bool,
    pub log_level: LevelFilter,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            request_logging: true,
            log_level: LevelFilter::Info,
        }
    }
}

/// Structured logger for API calls with correlation tracking
#[derive(Debug, Clone, Default)]
pub struct ApiLogger {
    config: MonitoringConfig,
}

/// Context for a single API call
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Unique correlation ID for this call
    pub correlation_id: String,
    /// "mutate" or "search"
    pub call: String,
    pub customer_id: String,
    /// Number of operations submitted (0 for searches)
    pub operation_count: usize,
    pub start_time: Instant,
}

impl ApiLogger {
    pub fn new(config: MonitoringConfig) -> Self {
        Self { config }
    }

    /// Start tracking a new call with a fresh correlation id
    pub fn start_call(&self, call: &str, customer_id: &str, operation_count: usize) -> CallContext {
        let context = CallContext {
            correlation_id: uuid::Uuid::new_v4().to_string(),
            call: call.to_string(),
            customer_id: customer_id.to_string(),
            operation_count,
            start_time: Instant::now(),
        };

        if self.config.request_logging && self.should_log(LevelFilter::Info) {
            let log_data = json!({
                "event": "call_started",
                "correlation_id": context.correlation_id,
                "call": context.call,
                "customer_id": context.customer_id,
                "operation_count": context.operation_count,
                "timestamp": chrono::Utc::now().to_rfc3339()
            });

            info!("API Call Started: {}", log_data);
        }

        context
    }

    /// Log HTTP request details
    pub fn log_request(&self, context: &CallContext, method: &str, url: &str, headers: &HashMap<String, String>) {
        if !self.config.request_logging || !self.should_log(LevelFilter::Debug) {
            return;
        }

        let log_data = json!({
            "event": "http_request",
            "correlation_id": context.correlation_id,
            "call": context.call,
            "method": method,
            "url": url,
            "headers": self.sanitize_headers(headers),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        debug!("HTTP Request: {}", log_data);
    }

    /// Log HTTP response details
    pub fn log_response(&self, context: &CallContext, status_code: u16) {
        if !self.config.request_logging || !self.should_log(LevelFilter::Debug) {
            return;
        }

        let log_data = json!({
            "event": "http_response",
            "correlation_id": context.correlation_id,
            "call": context.call,
            "status_code": status_code,
            "duration_ms": context.elapsed().as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        if status_code >= 400 {
            warn!("HTTP Response (Error): {}", log_data);
        } else {
            debug!("HTTP Response: {}", log_data);
        }
    }

    /// Log the per-operation outcome of a mutate call
    pub fn complete_mutate(&self, context: &CallContext, success_count: usize) {
        if !self.should_log(LevelFilter::Info) {
            return;
        }

        let failure_count = context.operation_count.saturating_sub(success_count);
        let log_data = json!({
            "event": "mutate_completed",
            "correlation_id": context.correlation_id,
            "customer_id": context.customer_id,
            "operation_count": context.operation_count,
            "success_count": success_count,
            "failure_count": failure_count,
            "duration_ms": context.elapsed().as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        if failure_count == 0 {
            info!("Mutate Completed: {}", log_data);
        } else {
            warn!("Mutate Completed With Failures: {}", log_data);
        }
    }

    /// Log a call that never produced a decodable response
    pub fn fail_call(&self, context: &CallContext, error_message: &str) {
        let log_data = json!({
            "event": "call_failed",
            "correlation_id": context.correlation_id,
            "call": context.call,
            "error_message": error_message,
            "duration_ms": context.elapsed().as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        error!("API Call Failed: {}", log_data);
    }

    fn should_log(&self, level: LevelFilter) -> bool {
        level <= self.config.log_level
    }

    /// Sanitize headers to remove sensitive information
    fn sanitize_headers(&self, headers: &HashMap<String, String>) -> HashMap<String, String> {
        let mut sanitized = HashMap::new();

        for (key, value) in headers {
            let key_lower = key.to_lowercase();
            if key_lower.contains("authorization") || key_lower.contains("token") || key_lower.contains("key") {
                sanitized.insert(key.clone(), "[REDACTED]".to_string());
            } else {
                sanitized.insert(key.clone(), value.clone());
            }
        }

        sanitized
    }
}

impl CallContext {
    /// Calculate elapsed time since the call started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
