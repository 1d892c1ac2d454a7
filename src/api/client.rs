use anyhow::Context;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;

use super::constants::{self, headers};
use super::logging::ApiLogger;
use super::operations::{OperationResult, Operations};
use super::response;
use super::transport::MutationApi;

/// Google Ads REST client with connection pooling
#[derive(Clone)]
pub struct GoogleAdsClient {
    base_url: String,
    access_token: String,
    developer_token: String,
    login_customer_id: Option<String>,
    http_client: reqwest::Client,
    logger: ApiLogger,
}

impl GoogleAdsClient {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        developer_token: impl Into<String>,
        login_customer_id: Option<String>,
    ) -> anyhow::Result<Self> {
        Ok(Self::with_custom_client(
            base_url,
            access_token,
            developer_token,
            login_customer_id,
            Self::build_http_client()?,
        ))
    }

    /// Create a new client with custom HTTP client configuration
    pub fn with_custom_client(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        developer_token: impl Into<String>,
        login_customer_id: Option<String>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            developer_token: developer_token.into(),
            login_customer_id,
            http_client,
            logger: ApiLogger::default(),
        }
    }

    pub fn build_http_client() -> anyhow::Result<reqwest::Client> {
        reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("search-campaign-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")
    }

    pub fn with_logger(mut self, logger: ApiLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_headers(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("Authorization".to_string(), format!("Bearer {}", self.access_token));
        map.insert(headers::DEVELOPER_TOKEN.to_string(), self.developer_token.clone());
        map.insert("Content-Type".to_string(), headers::CONTENT_TYPE_JSON.to_string());
        if let Some(login) = &self.login_customer_id {
            map.insert(headers::LOGIN_CUSTOMER_ID.to_string(), login.clone());
        }
        map
    }

    fn post(&self, url: &str, body: &Value) -> reqwest::RequestBuilder {
        let mut request = self.http_client.post(url).json(body);
        for (name, value) in self.request_headers() {
            request = request.header(name, value);
        }
        request
    }
}

#[async_trait]
impl MutationApi for GoogleAdsClient {
    async fn mutate(
        &self,
        customer_id: &str,
        operations: &Operations,
        atomic: bool,
    ) -> anyhow::Result<Vec<OperationResult>> {
        if operations.is_empty() {
            return Ok(Vec::new());
        }

        let url = constants::mutate_endpoint(&self.base_url, customer_id);
        let context = self.logger.start_call("mutate", customer_id, operations.len());
        self.logger.log_request(&context, "POST", &url, &self.request_headers());

        let body = json!({
            "mutateOperations": operations.to_mutate_operations(customer_id),
            "partialFailure": !atomic,
        });

        let response = match self.post(&url, &body).send().await {
            Ok(response) => response,
            Err(e) => {
                self.logger.fail_call(&context, &e.to_string());
                return Err(e).context("Mutate request failed");
            }
        };

        let status = response.status();
        self.logger.log_response(&context, status.as_u16());

        let text = response.text().await.context("Failed to read mutate response")?;
        let payload: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        let results = if status.is_success() {
            response::parse_mutate_response(operations, &payload)
        } else if status.is_client_error() && payload.get("error").is_some() {
            // Whole request rejected: nothing was committed
            response::parse_rejected_request(operations, &payload)
        } else {
            self.logger.fail_call(&context, &text);
            anyhow::bail!("Mutate request failed with HTTP {}: {}", status, text);
        };

        let success_count = results.iter().filter(|r| r.is_success()).count();
        self.logger.complete_mutate(&context, success_count);

        Ok(results)
    }

    async fn search(&self, customer_id: &str, query: &str) -> anyhow::Result<Vec<Value>> {
        let url = constants::search_endpoint(&self.base_url, customer_id);
        let context = self.logger.start_call("search", customer_id, 0);
        log::debug!("GAQL [{}]: {}", context.correlation_id, query);

        let mut rows = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut body = json!({ "query": query });
            if let Some(token) = &page_token {
                body["pageToken"] = json!(token);
            }

            self.logger.log_request(&context, "POST", &url, &self.request_headers());
            let response = self
                .post(&url, &body)
                .send()
                .await
                .context("Search request failed")?;

            let status = response.status();
            self.logger.log_response(&context, status.as_u16());

            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
                self.logger.fail_call(&context, &error_text);
                anyhow::bail!("Search failed with HTTP {}: {}", status, error_text);
            }

            let page: Value = response.json().await.context("Failed to decode search response")?;
            if let Some(results) = page.get("results").and_then(|r| r.as_array()) {
                rows.extend(results.iter().cloned());
            }

            page_token = page
                .get("nextPageToken")
                .and_then(|t| t.as_str())
                .filter(|t| !t.is_empty())
                .map(|t| t.to_string());

            if page_token.is_none() {
                break;
            }
        }

        log::debug!("Search [{}] returned {} rows", context.correlation_id, rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_headers_include_login_customer() {
        let client = GoogleAdsClient::with_custom_client(
            constants::API_BASE_URL,
            "token",
            "dev",
            Some("1112223333".to_string()),
            reqwest::Client::new(),
        );

        let headers = client.request_headers();
        assert_eq!(headers.get("Authorization"), Some(&"Bearer token".to_string()));
        assert_eq!(headers.get("developer-token"), Some(&"dev".to_string()));
        assert_eq!(headers.get("login-customer-id"), Some(&"1112223333".to_string()));
    }

    #[test]
    fn test_request_headers_without_login_customer() {
        let client = GoogleAdsClient::with_custom_client(
            constants::API_BASE_URL,
            "token",
            "dev",
            None,
            reqwest::Client::new(),
        );

        assert!(!client.request_headers().contains_key("login-customer-id"));
    }
}
