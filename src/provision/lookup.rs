use log::{debug, info};
use serde_json::Value;

use crate::account::AccountContext;
use crate::api::{EntityRef, MutationApi, OperationKind};
use crate::error::LookupError;

/// Finds the durable id of a just-created entity by its name.
///
/// Works for the named kinds: budgets, campaigns and ad groups.
pub struct ResolutionLookup<'a> {
    api: &'a dyn MutationApi,
    account: &'a AccountContext,
}

impl<'a> ResolutionLookup<'a> {
    pub fn new(api: &'a dyn MutationApi, account: &'a AccountContext) -> Self {
        Self { api, account }
    }

    /// Newest non-removed entity of `kind` named `name`
    pub async fn find_durable_ref(
        &self,
        kind: OperationKind,
        name: &str,
    ) -> Result<EntityRef, LookupError> {
        let query = lookup_query(kind, name);
        debug!("Lookup query: {}", query);

        let rows = self
            .api
            .search(&self.account.customer_id, &query)
            .await
            .map_err(LookupError::Transport)?;

        let found = rows
            .first()
            .and_then(|row| durable_ref_from_row(kind, row))
            .ok_or_else(|| LookupError::NotFound {
                kind: kind.as_str().to_string(),
                name: name.to_string(),
            })?;

        info!("Resolved {} '{}' to {}", kind.as_str(), name, found);
        Ok(found)
    }
}

/// GAQL query selecting the newest live entity with the given name
pub fn lookup_query(kind: OperationKind, name: &str) -> String {
    let resource = kind.gaql_resource();
    format!(
        "SELECT {r}.resource_name, {r}.id FROM {r} \
         WHERE {r}.name = '{name}' AND {r}.status != 'REMOVED' \
         ORDER BY {r}.id DESC LIMIT 1",
        r = resource,
        name = escape_gaql_string(name)
    )
}

fn escape_gaql_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Search rows nest fields under the camelCase resource name
fn durable_ref_from_row(kind: OperationKind, row: &Value) -> Option<EntityRef> {
    let entity = row.get(camel_case(kind.gaql_resource()))?;

    let from_name = entity
        .get("resourceName")
        .and_then(|n| n.as_str())
        .and_then(EntityRef::from_resource_name);

    let from_id = || {
        entity.get("id").and_then(|id| {
            id.as_i64()
                .or_else(|| id.as_str().and_then(|s| s.parse().ok()))
                .map(EntityRef::Durable)
        })
    };

    from_name.or_else(from_id).filter(EntityRef::is_durable)
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
