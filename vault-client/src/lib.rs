pub mod config;
pub mod error;
pub mod filters;
pub mod listing;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod utils;

use std::sync::Arc;

use config::Settings;
use listing::FileBrowser;
use services::{auth_client::AuthClient, file_client::FileClient, BearerToken};
use session::SessionGuard;
use storage::TokenStore;

pub use error::ApiError;
pub use filters::{FileFilter, FilterField};
pub use models::{Credentials, Identity, RemoteFile};
pub use session::{SessionSnapshot, SessionStatus};

/// Shared application state wiring the session guard and the file browser
/// together. The two components never depend on each other; they compose
/// only here, at the page level, around the single shared bearer-token slot.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionGuard>,
    pub browser: Arc<FileBrowser>,
}

impl AppState {
    pub fn new(session: Arc<SessionGuard>, browser: Arc<FileBrowser>) -> Self {
        Self { session, browser }
    }

    /// Build the full client from configuration: real HTTP collaborators,
    /// file-backed token store, shared bearer slot.
    pub fn from_settings(settings: &Settings) -> Self {
        let bearer = BearerToken::new();
        let store = TokenStore::new(&settings.storage.token_dir);

        let auth_client = Arc::new(AuthClient::new(settings.api.clone()));
        let file_client = Arc::new(FileClient::new(settings.api.clone(), bearer.clone()));

        let session = Arc::new(SessionGuard::new(auth_client, store, bearer));
        let browser = Arc::new(FileBrowser::new(file_client));

        Self { session, browser }
    }

    /// Tear the whole page state down on logout: ends the session, disarms
    /// the transport, and invalidates any in-flight listing fetch.
    pub fn logout(&self) {
        self.session.logout();
        self.browser.reset();
    }
}
