use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};

use crate::config::ApiSettings;
use crate::error::ApiError;
use crate::filters::FileQuery;
use crate::models::RemoteFile;
use crate::services::{check_response, BearerToken, FileApi};

/// HTTP client for the vault's file endpoints. Every request carries the
/// bearer token the Session Guard armed; with the slot disarmed the server
/// answers 401 and the call surfaces `ApiError::Unauthenticated`.
pub struct FileClient {
    client: Client,
    settings: ApiSettings,
    bearer: BearerToken,
}

impl FileClient {
    pub fn new(settings: ApiSettings, bearer: BearerToken) -> Self {
        Self {
            client: Client::new(),
            settings,
            bearer,
        }
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self.bearer.expose() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Resolve a server-relative storage path (e.g. `/uploads/abc`) against
    /// the API origin.
    fn blob_url(&self, storage_path: &str) -> Result<Url, ApiError> {
        let base = Url::parse(&self.settings.base_url).map_err(|e| {
            ApiError::Internal(anyhow::anyhow!(
                "Invalid API base URL {:?}: {}",
                self.settings.base_url,
                e
            ))
        })?;
        base.join(storage_path).map_err(|e| {
            ApiError::Internal(anyhow::anyhow!(
                "Invalid storage path {:?}: {}",
                storage_path,
                e
            ))
        })
    }
}

#[async_trait]
impl FileApi for FileClient {
    async fn list(&self, query: &FileQuery) -> Result<Vec<RemoteFile>, ApiError> {
        let url = format!("{}/files/", self.settings.base_url);

        let response = self
            .with_auth(self.client.get(&url).query(query))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send list request to {}: {}", url, e);
                ApiError::Network(e)
            })?;

        let response = check_response(response).await?;
        let files = response.json().await?;
        Ok(files)
    }

    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<RemoteFile, ApiError> {
        let url = format!("{}/files/", self.settings.base_url);

        let part = Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .with_auth(self.client.post(&url).multipart(form))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(filename = %filename, "Failed to send upload request: {}", e);
                ApiError::Network(e)
            })?;

        let response = check_response(response).await?;
        let file = response.json().await?;
        Ok(file)
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = format!("{}/files/{}/", self.settings.base_url, id);

        let response = self
            .with_auth(self.client.delete(&url))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(file_id = %id, "Failed to send delete request: {}", e);
                ApiError::Network(e)
            })?;

        check_response(response).await?;
        Ok(())
    }

    async fn download(&self, storage_path: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.blob_url(storage_path)?;

        let response = self
            .with_auth(self.client.get(url.clone()))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to download {}: {}", url, e);
                ApiError::Network(e)
            })?;

        let response = check_response(response).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
