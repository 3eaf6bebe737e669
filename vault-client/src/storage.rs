use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Well-known name of the persisted bearer token inside the storage
/// directory.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Single-value persisted store for the bearer token.
///
/// The host environment gives us one synchronously readable/writable string
/// slot; here that is a file under the configured storage directory. The
/// Session Guard is the only writer.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_STORAGE_KEY),
        }
    }

    /// Read the persisted token, if any. An unreadable or empty slot reads
    /// as absent; the guard treats absence and invalidity the same way.
    pub fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    /// Remove the persisted token. Clearing an already-empty slot succeeds.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
