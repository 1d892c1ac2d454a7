//! The boundary the provisioning engine drives

use async_trait::async_trait;
use serde_json::Value;

use super::operations::{OperationResult, Operations};

/// Remote mutation API: batched creates plus GAQL search.
///
/// `mutate` returns exactly one result per submitted operation, in submission
/// order. A request the API rejects as a whole comes back as failure results,
/// not as `Err`; `Err` is reserved for transport, auth and decoding failures.
#[async_trait]
pub trait MutationApi: Send + Sync {
    async fn mutate(
        &self,
        customer_id: &str,
        operations: &Operations,
        atomic: bool,
    ) -> anyhow::Result<Vec<OperationResult>>;

    /// Run a GAQL query and return every result row
    async fn search(&self, customer_id: &str, query: &str) -> anyhow::Result<Vec<Value>>;
}
