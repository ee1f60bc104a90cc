//! Token pair persistence.
//!
//! The access and refresh tokens survive restarts in a small JSON file
//! (`~/.fret/tokens.json` by default) written with 0o600 permissions. The
//! file is re-read on every access so an external edit or deletion is seen
//! immediately, matching how browser storage behaves.
//!
//! Both tokens are written together at login and removed together at
//! logout. A refresh only replaces the access token.

use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

/// The persisted token pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    /// Short-lived bearer token.
    #[serde(rename = "fret_access", default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    /// Long-lived token exchanged for new access tokens.
    #[serde(rename = "fret_refresh", default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
    /// ISO-8601 timestamp of the last write.
    #[serde(rename = "lastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl StoredTokens {
    /// A fresh pair as issued by login.
    pub fn pair(access: &str, refresh: &str) -> Self {
        Self {
            access: Some(access.to_string()),
            refresh: Some(refresh.to_string()),
            last_updated: None,
        }
    }

    /// Whether neither token is present.
    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }
}

/// Where the session keeps its tokens.
pub trait TokenStore: Send + Sync {
    /// Current contents. Missing or unreadable storage is empty.
    fn load(&self) -> StoredTokens;

    /// Replace the contents.
    fn save(&self, tokens: &StoredTokens) -> Result<(), AuthError>;

    /// Remove both tokens.
    fn clear(&self) -> Result<(), AuthError>;

    /// Replace the access token, keeping the refresh token, but only while
    /// `refresh` is still the stored refresh token.
    ///
    /// Returns `false` (and writes nothing) when the pair was cleared or
    /// replaced since `refresh` was read.
    fn replace_access(&self, refresh: &str, access: &str) -> Result<bool, AuthError> {
        let mut tokens = self.load();
        if tokens.refresh.as_deref() != Some(refresh) {
            return Ok(false);
        }
        tokens.access = Some(access.to_string());
        self.save(&tokens)?;
        Ok(true)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File store
// ─────────────────────────────────────────────────────────────────────────────

/// JSON file token store.
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    /// Store backed by `path`. Nothing is touched until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, tokens: &StoredTokens) -> Result<(), AuthError> {
        let mut tokens = tokens.clone();
        tokens.last_updated = Some(chrono::Utc::now().to_rfc3339());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&tokens)?;
        std::fs::write(&self.path, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&self.path, perms);
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> StoredTokens {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return StoredTokens::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to read token file: {e}");
                return StoredTokens::default();
            }
        };

        serde_json::from_str(&data).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "failed to parse token file: {e}");
            StoredTokens::default()
        })
    }

    fn save(&self, tokens: &StoredTokens) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock();
        self.write(tokens)
    }

    fn clear(&self) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock();
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn replace_access(&self, refresh: &str, access: &str) -> Result<bool, AuthError> {
        let _guard = self.write_lock.lock();
        let mut tokens = self.load();
        if tokens.refresh.as_deref() != Some(refresh) {
            return Ok(false);
        }
        tokens.access = Some(access.to_string());
        self.write(&tokens)?;
        Ok(true)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory store
// ─────────────────────────────────────────────────────────────────────────────

/// In-process token store, for tests and embedders that persist elsewhere.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<StoredTokens>,
}

impl MemoryTokenStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token pair.
    pub fn with_pair(access: &str, refresh: &str) -> Self {
        Self {
            tokens: RwLock::new(StoredTokens::pair(access, refresh)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> StoredTokens {
        self.tokens.read().clone()
    }

    fn save(&self, tokens: &StoredTokens) -> Result<(), AuthError> {
        *self.tokens.write() = tokens.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.tokens.write() = StoredTokens::default();
        Ok(())
    }

    fn replace_access(&self, refresh: &str, access: &str) -> Result<bool, AuthError> {
        let mut tokens = self.tokens.write();
        if tokens.refresh.as_deref() != Some(refresh) {
            return Ok(false);
        }
        tokens.access = Some(access.to_string());
        Ok(true)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
