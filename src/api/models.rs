use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// How the tool obtains an OAuth access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CredentialSet {
    /// Installed-app or web OAuth client with a long-lived refresh token
    RefreshToken {
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
    /// Pre-issued access token, used as-is
    AccessToken { access_token: String },
}

/// Everything needed to talk to the API besides the access token
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub developer_token: String,
    /// Manager (MCC) account the requests are made through, dashes stripped
    pub login_customer_id: Option<String>,
    pub credentials: CredentialSet,
}

#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: SystemTime,
    pub refresh_token: Option<String>,
}

impl TokenInfo {
    pub fn is_expired(&self) -> bool {
        SystemTime::now() >= self.expires_at
    }
}
