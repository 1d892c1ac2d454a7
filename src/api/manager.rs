use anyhow::Context;

use super::auth::AuthManager;
use super::client::GoogleAdsClient;
use super::constants::{self, env};
use super::models::{ApiCredentials, CredentialSet};

/// Builds authenticated Google Ads clients from environment credentials
pub struct ClientManager {
    credentials: ApiCredentials,
    base_url: String,
    auth_manager: AuthManager,
    http_client: reqwest::Client,
}

impl ClientManager {
    pub fn new(credentials: ApiCredentials, base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http_client = GoogleAdsClient::build_http_client()?;
        Ok(Self {
            credentials,
            base_url: base_url.into(),
            auth_manager: AuthManager::new(http_client.clone()),
            http_client,
        })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let developer_token = std::env::var(env::DEVELOPER_TOKEN)
            .with_context(|| format!("{} is not set", env::DEVELOPER_TOKEN))?;

        let login_customer_id = std::env::var(env::LOGIN_CUSTOMER_ID)
            .ok()
            .map(|id| constants::normalize_customer_id(&id))
            .filter(|id| !id.is_empty());

        let credentials = match std::env::var(env::ACCESS_TOKEN) {
            Ok(access_token) if !access_token.trim().is_empty() => {
                CredentialSet::AccessToken { access_token }
            }
            _ => CredentialSet::RefreshToken {
                client_id: std::env::var(env::CLIENT_ID)
                    .with_context(|| format!("{} is not set", env::CLIENT_ID))?,
                client_secret: std::env::var(env::CLIENT_SECRET)
                    .with_context(|| format!("{} is not set", env::CLIENT_SECRET))?,
                refresh_token: std::env::var(env::REFRESH_TOKEN)
                    .with_context(|| format!("{} is not set", env::REFRESH_TOKEN))?,
            },
        };

        let base_url =
            std::env::var(env::API_BASE_URL).unwrap_or_else(|_| constants::API_BASE_URL.to_string());

        Self::new(
            ApiCredentials {
                developer_token,
                login_customer_id,
                credentials,
            },
            base_url,
        )
    }

    pub async fn authenticate(&mut self) -> anyhow::Result<()> {
        self.auth_manager.authenticate(&self.credentials.credentials).await
    }

    /// Manager account requests are routed through, if configured
    pub fn login_customer_id(&self) -> Option<&str> {
        self.credentials.login_customer_id.as_deref()
    }

    /// Get a configured client; requires a prior `authenticate()`
    pub fn get_client(&self) -> anyhow::Result<GoogleAdsClient> {
        let access_token = self.auth_manager.access_token()?;

        Ok(GoogleAdsClient::with_custom_client(
            self.base_url.clone(),
            access_token,
            self.credentials.developer_token.clone(),
            self.credentials.login_customer_id.clone(),
            self.http_client.clone(),
        ))
    }
}
