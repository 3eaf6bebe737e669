use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ApiSettings;
use crate::error::ApiError;
use crate::models::Credentials;
use crate::services::{check_response, AuthApi};

/// HTTP client for the vault's authentication endpoints. Login and
/// registration are anonymous calls; no bearer token is attached.
pub struct AuthClient {
    client: Client,
    settings: ApiSettings,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

impl AuthClient {
    pub fn new(settings: ApiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }
}

#[async_trait]
impl AuthApi for AuthClient {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        let url = format!("{}/auth/login", self.settings.base_url);

        let response = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send login request to {}: {}", url, e);
                ApiError::Network(e)
            })?;

        let response = check_response(response).await?;
        let tokens: TokenResponse = response.json().await?;
        Ok(tokens.token)
    }

    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let url = format!("{}/auth/register", self.settings.base_url);

        let response = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send register request to {}: {}", url, e);
                ApiError::Network(e)
            })?;

        check_response(response).await?;
        Ok(())
    }
}
