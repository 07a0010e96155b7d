//! Bearer token storage.
//!
//! The facade looks tokens up through the [`TokenStore`] trait so that the
//! credential source is an explicit, injected collaborator. Two variants
//! exist: a plain in-memory store, and a file-backed store whose token
//! survives restarts of the polling process.

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::client::error::ApiError;

/// Get/set/clear contract for the single bearer token.
///
/// Implementations use interior mutability: the facade holds a shared
/// reference and rewrites the token after every successful refresh.
pub trait TokenStore: Send + Sync {
    /// Returns the current token, or [`ApiError::NoToken`] when none is set.
    fn get_token(&self) -> Result<String, ApiError>;
    /// Overwrites the token unconditionally.
    fn set_token(&self, token: String);
    /// Clears the token; subsequent `get_token` calls fail with `NoToken`.
    fn purge_token(&self);
}

/// Holds one optional token in memory.
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self {
            token: RwLock::new(None),
        }
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get_token(&self) -> Result<String, ApiError> {
        self.token
            .read()
            .expect("token lock poisoned")
            .clone()
            .ok_or(ApiError::NoToken)
    }

    fn set_token(&self, token: String) {
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    fn purge_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }
}

/// Same contract as [`MemoryTokenStore`], persisted to a file so the token
/// outlives the process. The in-memory copy is authoritative for the current
/// run; persistence failures are logged and do not fail the caller.
pub struct FileTokenStore {
    path: PathBuf,
    cached: RwLock<Option<String>>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: RwLock::new(None),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get_token(&self) -> Result<String, ApiError> {
        if let Some(token) = self.cached.read().expect("token lock poisoned").clone() {
            return Ok(token);
        }
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim().to_string();
                if token.is_empty() {
                    return Err(ApiError::NoToken);
                }
                *self.cached.write().expect("token lock poisoned") = Some(token.clone());
                Ok(token)
            }
            Err(_) => Err(ApiError::NoToken),
        }
    }

    fn set_token(&self, token: String) {
        if let Err(error) = fs::write(&self.path, &token) {
            tracing::warn!(path = %self.path.display(), %error, "failed to persist token");
        }
        *self.cached.write().expect("token lock poisoned") = Some(token);
    }

    fn purge_token(&self) {
        if self.path.exists() {
            if let Err(error) = fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), %error, "failed to remove token file");
            }
        }
        *self.cached.write().expect("token lock poisoned") = None;
    }
}
