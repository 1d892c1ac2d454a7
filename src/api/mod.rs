//! Google Ads REST API Module
//!
//! Typed create operations, the mutate/search transport, OAuth and the
//! adapter that turns raw response payloads into per-operation results.

pub mod auth;
pub mod client;
pub mod constants;
pub mod logging;
pub mod manager;
pub mod models;
pub mod operations;
pub mod response;
pub mod transport;

pub use auth::AuthManager;
pub use client::GoogleAdsClient;
pub use logging::{ApiLogger, CallContext, MonitoringConfig};
pub use manager::ClientManager;
pub use models::{ApiCredentials, CredentialSet, TokenInfo};
pub use operations::{
    ApiError, Criterion, EntityRef, EntityStatus, ErrorCategory, LabeledOperation, MatchType,
    Operation, OperationKind, OperationResult, Operations, ProvisionalTokens,
};
pub use transport::MutationApi;
