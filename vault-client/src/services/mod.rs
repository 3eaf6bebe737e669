pub mod auth_client;
pub mod file_client;

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};

use crate::error::ApiError;
use crate::filters::FileQuery;
use crate::models::{Credentials, RemoteFile};

/// Shared bearer-token slot the outbound clients read when building
/// requests. The Session Guard arms it after validating a token and disarms
/// it on logout or expiry; clients never write it.
#[derive(Clone, Default)]
pub struct BearerToken {
    inner: Arc<RwLock<Option<Secret<String>>>>,
}

impl BearerToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: &str) {
        *self.write() = Some(Secret::new(token.to_string()));
    }

    pub fn clear(&self) {
        *self.write() = None;
    }

    pub fn is_armed(&self) -> bool {
        self.read().is_some()
    }

    /// Expose the raw token for request construction.
    pub(crate) fn expose(&self) -> Option<String> {
        self.read()
            .as_ref()
            .map(|secret| secret.expose_secret().clone())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Secret<String>>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Secret<String>>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Remote authentication collaborator.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError>;

    /// Create an account. Does not authenticate it.
    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError>;
}

/// Remote file-storage collaborator.
#[async_trait]
pub trait FileApi: Send + Sync {
    async fn list(&self, query: &FileQuery) -> Result<Vec<RemoteFile>, ApiError>;

    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<RemoteFile, ApiError>;

    async fn delete(&self, id: &str) -> Result<(), ApiError>;

    /// Fetch the raw blob behind a server-relative storage path.
    async fn download(&self, storage_path: &str) -> Result<Vec<u8>, ApiError>;
}

/// Turn a non-success response into the matching `ApiError`, reading the
/// body as the server's message.
pub(crate) async fn check_response(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    let message = if message.is_empty() {
        status.to_string()
    } else {
        message.trim().to_string()
    };
    Err(ApiError::from_status(status.as_u16(), message))
}
