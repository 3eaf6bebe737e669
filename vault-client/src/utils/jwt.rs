use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Claims the client reads from a vault token. The token carries more, but
/// only the subject and the absolute expiry matter here.
#[derive(Debug, Deserialize)]
pub struct TokenClaims {
    pub username: String,
    /// Absolute expiry, seconds since the Unix epoch.
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token format")]
    Format,
    #[error("Failed to decode token payload: {0}")]
    Payload(#[from] base64::DecodeError),
    #[error("Failed to parse token claims: {0}")]
    Claims(#[from] serde_json::Error),
}

/// Decode token claims without validation.
///
/// The token is untrusted input: it comes out of persisted storage and may
/// be stale, truncated, or hand-edited. Decoding never verifies the
/// signature (the server does that on every request); the client only needs
/// the subject and expiry, and any malformed payload is reported as an
/// error rather than allowed to panic.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();

    if parts.len() != 3 {
        return Err(TokenError::Format);
    }

    // Decode the payload (second part)
    let payload = general_purpose::URL_SAFE_NO_PAD.decode(parts[1])?;
    let claims: TokenClaims = serde_json::from_slice(&payload)?;

    Ok(claims)
}

impl TokenClaims {
    /// Expired iff the expiry instant is not strictly in the future.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
