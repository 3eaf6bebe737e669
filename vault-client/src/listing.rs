use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use crate::error::ApiError;
use crate::filters::{self, FileFilter, FileQuery, FilterField};
use crate::models::RemoteFile;
use crate::services::FileApi;

/// State of the listing fetch keyed on the committed filter.
///
/// `Failed` does not clear previously displayed results: the browser keeps
/// the last successful result set visible and shows the error alongside it;
/// retry is a re-commit or refresh.
#[derive(Debug)]
pub enum FetchState {
    Idle,
    Loading,
    Success,
    Failed(ApiError),
}

/// Status of an independent side action (delete, download, upload). Each is
/// its own request; none is part of the filter state machine. The failed
/// variant keeps the rendered message; the typed error itself propagates to
/// the caller that started the action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    Pending,
    Success,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Delete,
    Download,
    Upload,
}

#[derive(Debug)]
struct ListingState {
    draft: FileFilter,
    committed: FileFilter,
    fetch: FetchState,
    results: Vec<RemoteFile>,
    /// Normalized key of the last issued fetch. Committing an identical key
    /// is a no-op.
    last_key: Option<FileQuery>,
    /// Bumped on every issued fetch and on reset; a completion whose
    /// generation is stale is ignored, so the latest committed key always
    /// wins regardless of response order.
    fetch_seq: u64,
    delete: ActionState,
    download: ActionState,
    upload: ActionState,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            draft: FileFilter::default(),
            committed: FileFilter::default(),
            fetch: FetchState::Idle,
            results: Vec::new(),
            last_key: None,
            fetch_seq: 0,
            delete: ActionState::Idle,
            download: ActionState::Idle,
            upload: ActionState::Idle,
        }
    }
}

/// Maintains the draft/committed filter split, derives action enablement,
/// and drives the listing fetch keyed on the committed filter only.
///
/// The draft is mutated field-by-field as the user types; the committed set
/// is replaced wholesale on commit or clear and is the only thing that ever
/// reaches the server.
pub struct FileBrowser {
    api: Arc<dyn FileApi>,
    state: RwLock<ListingState>,
}

impl FileBrowser {
    pub fn new(api: Arc<dyn FileApi>) -> Self {
        Self {
            api,
            state: RwLock::new(ListingState::default()),
        }
    }

    /// Set one draft field from user input. No fetch, no other side effect.
    pub fn update_field(&self, field: FilterField, value: impl Into<String>) {
        self.write().draft.set(field, value);
    }

    /// Commit enablement: the draft differs from what was last searched.
    pub fn is_dirty(&self) -> bool {
        let state = self.read();
        filters::is_dirty(&state.draft, &state.committed)
    }

    /// Clear enablement: any draft field holds a value.
    pub fn has_input(&self) -> bool {
        filters::has_input(&self.read().draft)
    }

    pub fn draft(&self) -> FileFilter {
        self.read().draft.clone()
    }

    pub fn committed(&self) -> FileFilter {
        self.read().committed.clone()
    }

    pub fn results(&self) -> Vec<RemoteFile> {
        self.read().results.clone()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.read().fetch, FetchState::Loading)
    }

    /// Last fetch error, if the most recent fetch failed.
    pub fn fetch_error(&self) -> Option<String> {
        match &self.read().fetch {
            FetchState::Failed(e) => Some(e.to_string()),
            _ => None,
        }
    }

    pub fn action_error(&self, action: Action) -> Option<String> {
        let state = self.read();
        let status = match action {
            Action::Delete => &state.delete,
            Action::Download => &state.download,
            Action::Upload => &state.upload,
        };
        match status {
            ActionState::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    pub fn action_pending(&self, action: Action) -> bool {
        let state = self.read();
        let status = match action {
            Action::Delete => &state.delete,
            Action::Download => &state.download,
            Action::Upload => &state.upload,
        };
        matches!(status, ActionState::Pending)
    }

    /// Replace the committed filter with the current draft and refetch.
    /// If the normalized key is unchanged, committing is idempotent and no
    /// request goes out.
    pub async fn commit(&self) {
        let ticket = {
            let mut state = self.write();
            let draft = state.draft.clone();
            state.committed = draft;
            let key = state.committed.to_query();
            if state.last_key.as_ref() == Some(&key) {
                None
            } else {
                Some(begin_fetch(&mut state, key))
            }
        };

        if let Some((seq, key)) = ticket {
            self.run_fetch(seq, key).await;
        }
    }

    /// Reset draft and committed to the all-empty default simultaneously,
    /// refetching if that changes the effective key. Idempotent.
    pub async fn clear(&self) {
        let ticket = {
            let mut state = self.write();
            state.draft = FileFilter::default();
            state.committed = FileFilter::default();
            let key = state.committed.to_query();
            if state.last_key.as_ref() == Some(&key) {
                None
            } else {
                Some(begin_fetch(&mut state, key))
            }
        };

        if let Some((seq, key)) = ticket {
            self.run_fetch(seq, key).await;
        }
    }

    /// Unconditionally refetch the current committed key. Used for the
    /// initial load and to invalidate the listing after a mutation.
    pub async fn refresh(&self) {
        let (seq, key) = {
            let mut state = self.write();
            let key = state.committed.to_query();
            begin_fetch(&mut state, key)
        };
        self.run_fetch(seq, key).await;
    }

    /// Delete a file, then refetch the unchanged committed key exactly once.
    /// The error also propagates so the caller can render it.
    pub async fn delete_file(&self, id: &str) -> Result<(), ApiError> {
        self.write().delete = ActionState::Pending;

        match self.api.delete(id).await {
            Ok(()) => {
                self.write().delete = ActionState::Success;
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                tracing::error!(file_id = %id, "Delete failed: {}", e);
                self.write().delete = ActionState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch the raw bytes of a stored file. Pure side action; filter and
    /// listing state are untouched.
    pub async fn download_file(&self, storage_path: &str) -> Result<Vec<u8>, ApiError> {
        self.write().download = ActionState::Pending;

        match self.api.download(storage_path).await {
            Ok(bytes) => {
                self.write().download = ActionState::Success;
                Ok(bytes)
            }
            Err(e) => {
                tracing::error!("Download failed: {}", e);
                self.write().download = ActionState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Upload a file, then refetch the current committed key so the new
    /// entry shows up if it matches the active filter.
    pub async fn upload_file(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<RemoteFile, ApiError> {
        self.write().upload = ActionState::Pending;

        match self.api.upload(filename, content_type, data).await {
            Ok(file) => {
                self.write().upload = ActionState::Success;
                self.refresh().await;
                Ok(file)
            }
            Err(e) => {
                tracing::error!(filename = %filename, "Upload failed: {}", e);
                self.write().upload = ActionState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Page-level teardown hook for logout: drops results and statuses and
    /// invalidates any in-flight fetch.
    pub fn reset(&self) {
        let mut state = self.write();
        let seq = state.fetch_seq + 1;
        *state = ListingState::default();
        state.fetch_seq = seq;
    }

    async fn run_fetch(&self, seq: u64, key: FileQuery) {
        let result = self.api.list(&key).await;

        let mut state = self.write();
        if state.fetch_seq != seq {
            // A later commit superseded this fetch; its outcome no longer
            // matters.
            return;
        }
        match result {
            Ok(files) => {
                state.results = files;
                state.fetch = FetchState::Success;
            }
            Err(e) => {
                tracing::error!("Listing fetch failed: {}", e);
                // Stale results stay visible; the error rides alongside.
                state.fetch = FetchState::Failed(e);
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ListingState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ListingState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn begin_fetch(state: &mut ListingState, key: FileQuery) -> (u64, FileQuery) {
    state.fetch_seq += 1;
    state.fetch = FetchState::Loading;
    state.last_key = Some(key.clone());
    (state.fetch_seq, key)
}
