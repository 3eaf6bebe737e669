use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-owned file metadata, fetched and rendered keyed on the committed
/// filter. Wire names follow the vault API's JSON; the client-side names
/// say what the fields actually are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub id: String,
    /// Server-relative path to the stored blob, resolved against the API
    /// origin for downloads.
    #[serde(rename = "file")]
    pub storage_path: String,
    pub original_filename: String,
    #[serde(rename = "file_type")]
    pub mime_type: String,
    #[serde(rename = "size")]
    pub size_bytes: i64,
    /// SHA-256 content hash the server uses for deduplication.
    #[serde(default)]
    pub hash: String,
    pub uploaded_at: DateTime<Utc>,
}
