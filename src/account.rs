//! Client account selection

use log::info;
use serde_json::Value;

use crate::api::MutationApi;
use crate::api::constants::normalize_customer_id;
use crate::error::ProvisionError;

/// The account every mutation and lookup of a run targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountContext {
    /// Ten digits, no dashes
    pub customer_id: String,
    pub descriptive_name: String,
}

impl AccountContext {
    pub fn new(customer_id: impl AsRef<str>, descriptive_name: impl Into<String>) -> Self {
        Self {
            customer_id: normalize_customer_id(customer_id.as_ref()),
            descriptive_name: descriptive_name.into(),
        }
    }

    /// Customer id formatted as 123-456-7890
    pub fn display_id(&self) -> String {
        let id = &self.customer_id;
        if id.len() == 10 && id.is_ascii() {
            format!("{}-{}-{}", &id[0..3], &id[3..6], &id[6..])
        } else {
            id.clone()
        }
    }
}

impl std::fmt::Display for AccountContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.descriptive_name.is_empty() {
            write!(f, "{}", self.display_id())
        } else {
            write!(f, "{} ({})", self.descriptive_name, self.display_id())
        }
    }
}

/// Resolve the configured customer id to an accessible account.
///
/// With a manager (login) account the client is looked up among the
/// manager's `customer_client` links; otherwise the account is read directly.
pub async fn select_account(
    api: &dyn MutationApi,
    customer_id: &str,
    login_customer_id: Option<&str>,
) -> Result<AccountContext, ProvisionError> {
    let customer_id = normalize_customer_id(customer_id);

    let (query_customer, query, section) = match login_customer_id {
        Some(manager) if normalize_customer_id(manager) != customer_id => (
            normalize_customer_id(manager),
            format!(
                "SELECT customer_client.id, customer_client.descriptive_name \
                 FROM customer_client WHERE customer_client.id = {}",
                customer_id
            ),
            "customerClient",
        ),
        _ => (
            customer_id.clone(),
            "SELECT customer.id, customer.descriptive_name FROM customer LIMIT 1".to_string(),
            "customer",
        ),
    };

    let rows = api.search(&query_customer, &query).await.map_err(|e| {
        ProvisionError::Configuration(format!(
            "account {} not found or not accessible: {:#}",
            customer_id, e
        ))
    })?;

    let row = rows.first().ok_or_else(|| {
        ProvisionError::Configuration(format!(
            "account {} not found or not accessible",
            customer_id
        ))
    })?;

    let account = AccountContext::new(&customer_id, descriptive_name(row, section));
    info!("Selected account: {}", account);
    Ok(account)
}

fn descriptive_name(row: &Value, section: &str) -> String {
    row.get(section)
        .and_then(|s| s.get("descriptiveName"))
        .and_then(|n| n.as_str())
        .unwrap_or_default()
        .to_string()
}
