//! API Constants and Configuration for the Google Ads REST API

/// Google Ads API version
pub const API_VERSION: &str = "v17";

/// Default API host
pub const API_BASE_URL: &str = "https://googleads.googleapis.com";

/// OAuth 2.0 token endpoint used to exchange refresh tokens
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Environment variables holding API credentials
pub mod env {
    pub const DEVELOPER_TOKEN: &str = "GOOGLE_ADS_DEVELOPER_TOKEN";
    pub const CLIENT_ID: &str = "GOOGLE_ADS_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "GOOGLE_ADS_CLIENT_SECRET";
    pub const REFRESH_TOKEN: &str = "GOOGLE_ADS_REFRESH_TOKEN";
    pub const ACCESS_TOKEN: &str = "GOOGLE_ADS_ACCESS_TOKEN";
    pub const LOGIN_CUSTOMER_ID: &str = "GOOGLE_ADS_LOGIN_CUSTOMER_ID";
    pub const API_BASE_URL: &str = "GOOGLE_ADS_API_BASE_URL";
}

/// Standard headers for Google Ads requests
pub mod headers {
    pub const DEVELOPER_TOKEN: &str = "developer-token";
    pub const LOGIN_CUSTOMER_ID: &str = "login-customer-id";
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// Versioned API root
pub fn api_root(base_url: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), API_VERSION)
}

/// `customers/{id}/googleAds:mutate`
pub fn mutate_endpoint(base_url: &str, customer_id: &str) -> String {
    format!("{}/customers/{}/googleAds:mutate", api_root(base_url), customer_id)
}

/// `customers/{id}/googleAds:search`
pub fn search_endpoint(base_url: &str, customer_id: &str) -> String {
    format!("{}/customers/{}/googleAds:search", api_root(base_url), customer_id)
}

/// Strip dashes from a customer id such as `123-456-7890`
pub fn normalize_customer_id(customer_id: &str) -> String {
    customer_id.chars().filter(|c| *c != '-' && !c.is_whitespace()).collect()
}
