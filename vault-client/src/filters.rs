use serde::Serialize;

/// User-facing filter values, one record shape used for both the draft the
/// user is editing and the committed set last applied to the listing query.
///
/// Every field defaults to empty; the empty string is the "unset"
/// representation and is omitted from the remote query. Size bounds are held
/// in kilobytes exactly as typed and only converted at fetch-key
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileFilter {
    pub search: String,
    pub file_type: String,
    pub size_min: String,
    pub size_max: String,
    pub uploaded_after: String,
    pub uploaded_before: String,
}

/// Names of the individually editable filter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Search,
    FileType,
    SizeMin,
    SizeMax,
    UploadedAfter,
    UploadedBefore,
}

impl FileFilter {
    /// Set a single field from user input. Pure state update, no side
    /// effects.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FilterField::Search => self.search = value,
            FilterField::FileType => self.file_type = value,
            FilterField::SizeMin => self.size_min = value,
            FilterField::SizeMax => self.size_max = value,
            FilterField::UploadedAfter => self.uploaded_after = value,
            FilterField::UploadedBefore => self.uploaded_before = value,
        }
    }

    /// Build the normalized remote query. Empty fields are dropped entirely
    /// so the server's absence-of-filter semantics apply; size bounds typed
    /// in KB become byte counts. Unparsable size input degrades to unset,
    /// mirroring the server's own lenient parsing.
    pub fn to_query(&self) -> FileQuery {
        FileQuery {
            search: non_empty(&self.search),
            file_type: non_empty(&self.file_type),
            size_min: kb_to_bytes(&self.size_min),
            size_max: kb_to_bytes(&self.size_max),
            uploaded_after: non_empty(&self.uploaded_after),
            uploaded_before: non_empty(&self.uploaded_before),
        }
    }
}

/// Commit is enabled only while the draft differs from what was last
/// searched. Whole-structure comparison, no tracked dirty flag to drift.
pub fn is_dirty(draft: &FileFilter, committed: &FileFilter) -> bool {
    draft != committed
}

/// Clear is enabled whenever any draft field holds a value, independent of
/// commit state.
pub fn has_input(draft: &FileFilter) -> bool {
    *draft != FileFilter::default()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn kb_to_bytes(value: &str) -> Option<u64> {
    // Out-of-range input degrades to unset the same way unparsable input
    // does; a typed size must never abort the fetch.
    value
        .parse::<u64>()
        .ok()
        .and_then(|kb| kb.checked_mul(1024))
}

/// Normalized fetch key sent as query parameters on the listing request.
/// Equality on this type defines fetch-key identity: identical committed
/// filters produce equal keys and must not refetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_max: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_before: Option<String>,
}
