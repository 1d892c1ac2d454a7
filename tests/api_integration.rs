//! Google Ads REST client against a local canned-response server

use anyhow::Result;
use search_campaign_cli::api::{
    ClientManager, EntityRef, EntityStatus, ErrorCategory, GoogleAdsClient, MatchType,
    MutationApi, Operation, Operations,
};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one HTTP response and hand back the raw request
async fn serve_once(status: &'static str, body: Value) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buffer = [0u8; 4096];

        loop {
            let n = socket.read(&mut buffer).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buffer[..n]);

            let text = String::from_utf8_lossy(&request);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        let body = body.to_string();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&request).to_string()
    });

    (base_url, handle)
}

fn keywords(texts: &[&str]) -> Operations {
    let mut ops = Operations::new();
    for text in texts {
        ops.push(
            format!("Keyword: {}", text),
            Operation::Keyword {
                ad_group: EntityRef::Durable(55),
                text: text.to_string(),
                match_type: MatchType::Phrase,
                status: EntityStatus::Enabled,
            },
        );
    }
    ops
}

/// Partial failure: second keyword rejected, first and third created
#[tokio::test]
async fn test_mutate_partial_failure_round_trip() {
    let (base_url, request) = serve_once(
        "200 OK",
        json!({
            "mutateOperationResponses": [
                {"adGroupCriterionResult": {"resourceName": "customers/1234567890/adGroupCriteria/55~1"}},
                {},
                {"adGroupCriterionResult": {"resourceName": "customers/1234567890/adGroupCriteria/55~3"}}
            ],
            "partialFailureError": {
                "code": 3,
                "message": "Multiple errors in 'details'.",
                "details": [{
                    "@type": "type.googleapis.com/google.ads.googleads.v17.errors.GoogleAdsFailure",
                    "errors": [{
                        "errorCode": {"policyFindingError": "POLICY_FINDING"},
                        "message": "A policy finding was detected.",
                        "location": {"fieldPathElements": [{"fieldName": "mutate_operations", "index": 1}]}
                    }]
                }]
            }
        }),
    )
    .await;

    let client = GoogleAdsClient::new(base_url, "token", "dev-token", Some("9998887777".to_string()))
        .unwrap();
    let results = client
        .mutate("1234567890", &keywords(&["a", "b", "c"]), false)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert!(results[0].is_success());
    assert_eq!(results[1].error().unwrap().category, ErrorCategory::Policy);
    assert!(results[2].is_success());

    let request = request.await.unwrap();
    assert!(request.starts_with("POST /v17/customers/1234567890/googleAds:mutate"));
    assert!(request.to_lowercase().contains("developer-token: dev-token"));
    assert!(request.to_lowercase().contains("login-customer-id: 9998887777"));
    assert!(request.contains("\"partialFailure\":true"));
}

/// A rejected atomic request turns into failure results, not an error
#[tokio::test]
async fn test_rejected_atomic_request_yields_failures() {
    let (base_url, _request) = serve_once(
        "400 Bad Request",
        json!({
            "error": {
                "code": 400,
                "message": "Request contains an invalid argument.",
                "status": "INVALID_ARGUMENT",
                "details": [{
                    "errors": [{
                        "errorCode": {"campaignError": "DUPLICATE_CAMPAIGN_NAME"},
                        "message": "A campaign with this name already exists.",
                        "location": {"fieldPathElements": [{"fieldName": "mutate_operations", "index": 0}]}
                    }]
                }]
            }
        }),
    )
    .await;

    let client = GoogleAdsClient::new(base_url, "token", "dev-token", None).unwrap();
    let ops = Operations::new().add(
        "Campaign: SEA_Shoes",
        Operation::Campaign {
            id: EntityRef::Provisional(-2),
            name: "SEA_Shoes".to_string(),
            status: EntityStatus::Paused,
            budget: EntityRef::Durable(1001),
        },
    );

    let results = client.mutate("1234567890", &ops, true).await.unwrap();
    assert_eq!(results.len(), 1);
    let error = results[0].error().unwrap();
    assert_eq!(error.code, "DUPLICATE_CAMPAIGN_NAME");
    assert_eq!(error.message, "A campaign with this name already exists.");
}

/// Server errors without a structured body are transport errors
#[tokio::test]
async fn test_server_error_is_transport_error() {
    let (base_url, _request) = serve_once("503 Service Unavailable", json!("unavailable")).await;

    let client = GoogleAdsClient::new(base_url, "token", "dev-token", None).unwrap();
    assert!(client.mutate("1234567890", &keywords(&["a"]), false).await.is_err());
}

/// Search returns the result rows
#[tokio::test]
async fn test_search_returns_rows() {
    let (base_url, request) = serve_once(
        "200 OK",
        json!({
            "results": [{"campaign": {"resourceName": "customers/1234567890/campaigns/42", "id": "42"}}]
        }),
    )
    .await;

    let client = GoogleAdsClient::new(base_url, "token", "dev-token", None).unwrap();
    let rows = client
        .search("1234567890", "SELECT campaign.id FROM campaign")
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["campaign"]["id"], "42");
    assert!(request.await.unwrap().starts_with("POST /v17/customers/1234567890/googleAds:search"));
}

#[tokio::test]
#[ignore] // Requires real credentials in .env
async fn test_auth_with_real_credentials() -> Result<()> {
    let mut manager = ClientManager::from_env()?;
    manager.authenticate().await?;

    let client = manager.get_client()?;
    let customer_id = std::env::var("GOOGLE_ADS_TEST_CUSTOMER_ID")?;
    let rows = client
        .search(&customer_id, "SELECT customer.id, customer.descriptive_name FROM customer LIMIT 1")
        .await?;

    assert_eq!(rows.len(), 1);
    Ok(())
}
