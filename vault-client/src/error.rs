use thiserror::Error;

/// Client-facing error taxonomy for remote vault operations.
///
/// Session resolution never produces one of these: decode and expiry problems
/// collapse into `SessionStatus::Unauthenticated` inside the guard. Action
/// errors (login, register, delete, download, upload) propagate to the
/// initiating caller, which owns rendering them.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Map a non-success HTTP status to the error kind a caller can act on.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ApiError::Unauthenticated,
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            _ => ApiError::Server { status, message },
        }
    }
}
