//! Shared fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use search_campaign_cli::account::AccountContext;
use search_campaign_cli::api::{ApiError, ErrorCategory, MutationApi, OperationResult, Operations};
use search_campaign_cli::config::Config;
use search_campaign_cli::sheet::SheetData;
use serde_json::{Map, Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const CUSTOMER_ID: &str = "1234567890";

/// One recorded mutate call
#[derive(Debug, Clone)]
pub struct RecordedBatch {
    pub labels: Vec<String>,
    pub atomic: bool,
    pub payload: Vec<Value>,
}

/// In-memory mutation API with scripted per-label failures.
///
/// Created entities get ids counting up from 1001. An atomic submission with
/// a failing operation fails as a whole, like the real endpoint.
pub struct MockApi {
    failures: HashMap<String, ApiError>,
    omit_resource_names: bool,
    missing_lookups: HashSet<&'static str>,
    unavailable_from: Option<usize>,
    next_id: Mutex<i64>,
    created: Mutex<HashMap<&'static str, String>>,
    pub batches: Mutex<Vec<RecordedBatch>>,
    pub searches: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            failures: HashMap::new(),
            omit_resource_names: false,
            missing_lookups: HashSet::new(),
            unavailable_from: None,
            next_id: Mutex::new(1000),
            created: Mutex::new(HashMap::new()),
            batches: Mutex::new(Vec::new()),
            searches: Mutex::new(Vec::new()),
        }
    }

    /// Fail the operation with this label
    pub fn fail(mut self, label: &str, error: ApiError) -> Self {
        self.failures.insert(label.to_string(), error);
        self
    }

    /// Report successes without resource names
    pub fn without_resource_names(mut self) -> Self {
        self.omit_resource_names = true;
        self
    }

    /// Name lookups for this GAQL resource return no rows
    pub fn missing(mut self, resource: &'static str) -> Self {
        self.missing_lookups.insert(resource);
        self
    }

    /// Mutate calls from this zero-based call number on fail at the HTTP level
    pub fn unavailable_from(mut self, call: usize) -> Self {
        self.unavailable_from = Some(call);
        self
    }

    pub fn batches(&self) -> Vec<RecordedBatch> {
        self.batches.lock().unwrap().clone()
    }

    fn lookup_row(&self, resource: &'static str, section: &str, collection: &str) -> Vec<Value> {
        if self.missing_lookups.contains(resource) {
            return Vec::new();
        }
        match self.created.lock().unwrap().get(collection) {
            Some(name) => {
                let mut row = Map::new();
                row.insert(section.to_string(), json!({ "resourceName": name }));
                vec![Value::Object(row)]
            }
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl MutationApi for MockApi {
    async fn mutate(
        &self,
        customer_id: &str,
        operations: &Operations,
        atomic: bool,
    ) -> anyhow::Result<Vec<OperationResult>> {
        let call = {
            let mut batches = self.batches.lock().unwrap();
            batches.push(RecordedBatch {
                labels: operations.iter().map(|l| l.label.clone()).collect(),
                atomic,
                payload: operations.to_mutate_operations(customer_id),
            });
            batches.len() - 1
        };
        if self.unavailable_from.is_some_and(|from| call >= from) {
            anyhow::bail!("HTTP 503 Service Unavailable");
        }

        let rejection = operations
            .iter()
            .find_map(|l| self.failures.get(&l.label).cloned());
        if atomic {
            if let Some(error) = rejection {
                return Ok(operations
                    .iter()
                    .map(|_| OperationResult::failure(error.clone()))
                    .collect());
            }
        }

        let mut results = Vec::new();
        for labeled in operations {
            if let Some(error) = self.failures.get(&labeled.label) {
                results.push(OperationResult::failure(error.clone()));
                continue;
            }

            let collection = labeled.operation.kind().collection();
            let id = {
                let mut next = self.next_id.lock().unwrap();
                *next += 1;
                *next
            };
            let name = format!("customers/{}/{}/{}", customer_id, collection, id);
            self.created.lock().unwrap().insert(collection, name.clone());

            results.push(OperationResult::success(if self.omit_resource_names {
                None
            } else {
                Some(name)
            }));
        }
        Ok(results)
    }

    async fn search(&self, _customer_id: &str, query: &str) -> anyhow::Result<Vec<Value>> {
        self.searches.lock().unwrap().push(query.to_string());

        if query.contains("FROM customer_client") {
            return Ok(vec![json!({"customerClient": {"id": CUSTOMER_ID, "descriptiveName": "Shoe Shop"}})]);
        }
        if query.contains("FROM campaign_budget ") {
            return Ok(self.lookup_row("campaign_budget", "campaignBudget", "campaignBudgets"));
        }
        if query.contains("FROM campaign ") {
            return Ok(self.lookup_row("campaign", "campaign", "campaigns"));
        }
        Ok(Vec::new())
    }
}

pub fn policy_error() -> ApiError {
    ApiError::new(
        "POLICY_FINDING",
        "A policy finding was detected for this keyword.",
        ErrorCategory::Policy,
    )
}

pub fn request_error(code: &str, message: &str) -> ApiError {
    ApiError::new(code, message, ErrorCategory::Request)
}

pub fn config() -> Config {
    Config::from_toml_str(
        r#"
        [account]
        customer_id = "123-456-7890"

        [sheet]
        source = "campaign.csv"

        [campaign]
        name = "SEA_Shoes"
        ad_group_name = "Running"
        final_url = "https://example.com/shoes"
        daily_budget = 200
        "#,
    )
    .expect("test config parses")
}

pub fn account() -> AccountContext {
    AccountContext::new(CUSTOMER_ID, "Shoe Shop")
}

pub fn sheet(keywords: usize, headlines: usize, descriptions: usize, callouts: usize) -> SheetData {
    SheetData {
        keywords: (1..=keywords).map(|i| format!("keyword {}", i)).collect(),
        headlines: (1..=headlines).map(|i| format!("Headline {}", i)).collect(),
        descriptions: (1..=descriptions).map(|i| format!("Description {}", i)).collect(),
        callouts: (1..=callouts).map(|i| format!("Callout {}", i)).collect(),
    }
}
