use std::time::{Duration, SystemTime};

use super::constants::TOKEN_URL;
use super::models::{CredentialSet, TokenInfo};

/// Obtains and caches the OAuth access token for API calls
pub struct AuthManager {
    http_client: reqwest::Client,
    token_url: String,
    token: Option<TokenInfo>,
}

impl AuthManager {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            token_url: TOKEN_URL.to_string(),
            token: None,
        }
    }

    /// Point the token exchange at a different endpoint
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn token(&self) -> Option<&TokenInfo> {
        self.token.as_ref()
    }

    /// Get a valid access token, authenticating if needed
    pub fn access_token(&self) -> anyhow::Result<&str> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Not authenticated. Call authenticate() first."))?;

        if token.is_expired() {
            anyhow::bail!("Access token has expired. Please re-authenticate.");
        }

        Ok(&token.access_token)
    }

    pub async fn authenticate(&mut self, credentials: &CredentialSet) -> anyhow::Result<()> {
        match credentials {
            CredentialSet::AccessToken { access_token } => {
                log::info!("Using pre-issued access token");
                self.token = Some(TokenInfo {
                    access_token: access_token.clone(),
                    // Lifetime unknown; Google issues one-hour tokens
                    expires_at: SystemTime::now() + Duration::from_secs(3600),
                    refresh_token: None,
                });
                Ok(())
            }
            CredentialSet::RefreshToken {
                client_id,
                client_secret,
                refresh_token,
            } => {
                log::info!("Exchanging refresh token at {}", self.token_url);

                let response = self
                    .http_client
                    .post(&self.token_url)
                    .form(&[
                        ("grant_type", "refresh_token"),
                        ("client_id", client_id.as_str()),
                        ("client_secret", client_secret.as_str()),
                        ("refresh_token", refresh_token.as_str()),
                    ])
                    .send()
                    .await?;

                log::debug!("Token request status: {}", response.status());

                if response.status().is_success() {
                    let token_data: serde_json::Value = response.json().await?;

                    if let Some(access_token) = token_data.get("access_token").and_then(|t| t.as_str()) {
                        // Calculate expiration (default to 1 hour if not provided)
                        let expires_in = token_data
                            .get("expires_in")
                            .and_then(|e| e.as_u64())
                            .unwrap_or(3600);

                        self.token = Some(TokenInfo {
                            access_token: access_token.to_string(),
                            expires_at: SystemTime::now() + Duration::from_secs(expires_in),
                            refresh_token: Some(refresh_token.clone()),
                        });

                        log::info!("Successfully authenticated");
                        Ok(())
                    } else {
                        anyhow::bail!("No access token in response")
                    }
                } else {
                    let error_text = response.text().await?;
                    anyhow::bail!("Authentication failed: {}", error_text)
                }
            }
        }
    }
}
