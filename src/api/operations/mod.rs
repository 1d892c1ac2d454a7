//! Google Ads Operations Module
//!
//! Typed create operations, provisional/durable entity references and the
//! per-operation results returned by the mutate endpoint.

pub mod entity_ref;
pub mod operation;
pub mod operations;
pub mod result;

pub use entity_ref::{EntityRef, ProvisionalTokens};
pub use operation::{Criterion, EntityStatus, MatchType, Operation, OperationKind};
pub use operations::{LabeledOperation, Operations};
pub use result::{ApiError, ErrorCategory, OperationResult};
