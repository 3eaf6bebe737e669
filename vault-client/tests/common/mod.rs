use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use tokio::sync::Notify;

use vault_client::error::ApiError;
use vault_client::filters::FileQuery;
use vault_client::models::{Credentials, RemoteFile};
use vault_client::services::{AuthApi, FileApi};

/// Forge an unsigned JWT-shaped token with the given subject and expiry.
pub fn forge_token(username: &str, exp: i64) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = general_purpose::URL_SAFE_NO_PAD
        .encode(format!(r#"{{"username":"{username}","exp":{exp}}}"#));
    format!("{header}.{payload}.signature")
}

pub fn far_future() -> i64 {
    Utc::now().timestamp() + 3600
}

pub fn long_past() -> i64 {
    Utc::now().timestamp() - 3600
}

pub fn make_file(id: &str, name: &str) -> RemoteFile {
    RemoteFile {
        id: id.to_string(),
        storage_path: format!("/uploads/{id}"),
        original_filename: name.to_string(),
        mime_type: "application/octet-stream".to_string(),
        size_bytes: 1024,
        hash: format!("hash-{id}"),
        uploaded_at: Utc::now(),
    }
}

/// In-memory stand-in for the remote authentication service.
#[derive(Default)]
pub struct FakeAuthApi {
    pub accounts: Mutex<HashMap<String, String>>,
    /// When set, login returns this token verbatim instead of forging one.
    pub token_override: Mutex<Option<String>>,
    pub login_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
}

impl FakeAuthApi {
    pub fn with_account(username: &str, password: &str) -> Self {
        let fake = Self::default();
        fake.accounts
            .lock()
            .unwrap()
            .insert(username.to_string(), password.to_string());
        fake
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(token) = self.token_override.lock().unwrap().clone() {
            return Ok(token);
        }

        let accounts = self.accounts.lock().unwrap();
        match accounts.get(&credentials.username) {
            Some(password) if *password == credentials.password => {
                Ok(forge_token(&credentials.username, far_future()))
            }
            _ => Err(ApiError::Unauthenticated),
        }
    }

    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&credentials.username) {
            return Err(ApiError::Conflict("Username already exists".to_string()));
        }
        accounts.insert(credentials.username.clone(), credentials.password.clone());
        Ok(())
    }
}

/// In-memory stand-in for the remote file service. Listing filters on the
/// search term only, which is all the scenarios need; every received query
/// is recorded for assertions.
#[derive(Default)]
pub struct FakeFileApi {
    pub files: Mutex<Vec<RemoteFile>>,
    pub list_calls: Mutex<Vec<FileQuery>>,
    pub fail_list: AtomicBool,
    /// When the incoming query's search equals this value, the listing call
    /// parks until `release` is notified. Lets tests interleave fetches.
    pub block_on_search: Mutex<Option<String>>,
    pub release: Notify,
}

impl FakeFileApi {
    pub fn with_files(files: Vec<RemoteFile>) -> Self {
        let fake = Self::default();
        *fake.files.lock().unwrap() = files;
        fake
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    pub fn last_query(&self) -> Option<FileQuery> {
        self.list_calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl FileApi for FakeFileApi {
    async fn list(&self, query: &FileQuery) -> Result<Vec<RemoteFile>, ApiError> {
        self.list_calls.lock().unwrap().push(query.clone());

        let blocked = {
            let block = self.block_on_search.lock().unwrap();
            block.is_some() && *block == query.search
        };
        if blocked {
            self.release.notified().await;
        }

        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ApiError::Server {
                status: 500,
                message: "listing unavailable".to_string(),
            });
        }

        let files = self.files.lock().unwrap();
        let matching = files
            .iter()
            .filter(|f| match &query.search {
                Some(term) => f.original_filename.contains(term.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        Ok(matching)
    }

    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<RemoteFile, ApiError> {
        let file = RemoteFile {
            id: format!("upload-{filename}"),
            storage_path: format!("/uploads/upload-{filename}"),
            original_filename: filename.to_string(),
            mime_type: content_type.to_string(),
            size_bytes: data.len() as i64,
            hash: String::new(),
            uploaded_at: Utc::now(),
        };
        self.files.lock().unwrap().push(file.clone());
        Ok(file)
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let mut files = self.files.lock().unwrap();
        let before = files.len();
        files.retain(|f| f.id != id);
        if files.len() == before {
            return Err(ApiError::NotFound(format!("file {id}")));
        }
        Ok(())
    }

    async fn download(&self, storage_path: &str) -> Result<Vec<u8>, ApiError> {
        let files = self.files.lock().unwrap();
        if files.iter().any(|f| f.storage_path == storage_path) {
            Ok(b"file contents".to_vec())
        } else {
            Err(ApiError::NotFound(format!("blob {storage_path}")))
        }
    }
}
