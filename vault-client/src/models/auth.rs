use serde::Serialize;
use validator::Validate;

/// Login/registration payload.
///
/// Validated client-side before any network call: the server rejects
/// passwords shorter than 8 characters, so a too-short password must never
/// reach the wire.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Identity derived from a validated token. Present iff the session is
/// authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
}
