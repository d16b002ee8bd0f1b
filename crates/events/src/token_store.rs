//! Device token persistence collaborator.
//!
//! The push provider rotates the device token from time to time; the latest
//! value is written under a single fixed key, replacing whatever was there.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Key under which the token is stored.
pub const TOKEN_KEY: &str = "token";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for token persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Token store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// TokenStore
// ---------------------------------------------------------------------------

/// Persists the current device token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Overwrite the stored token.
    async fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Read the stored token, if one was ever saved.
    async fn load(&self) -> Result<Option<String>, TokenStoreError>;
}

// ---------------------------------------------------------------------------
// MemoryTokenStore
// ---------------------------------------------------------------------------

/// Token store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.read().await.clone())
    }
}

// ---------------------------------------------------------------------------
// FileTokenStore
// ---------------------------------------------------------------------------

/// Token store backed by a flat JSON key/value file.
///
/// Other keys already present in the file are kept on save. An unreadable
/// file is replaced rather than blocking the save. Each save writes a sibling
/// temp file and renames it into place, so the file is never half-written.
/// Writes are serialized through an internal lock.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: tokio::sync::Mutex<()>,
}

type Entries = serde_json::Map<String, serde_json::Value>;

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_entries(&self) -> Result<Entries, TokenStoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Entries::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock().await;

        let mut entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(TokenStoreError::Json(e)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Token file is corrupt, rewriting it"
                );
                Entries::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(TOKEN_KEY.to_string(), token.into());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(&entries)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        let _guard = self.lock.lock().await;
        let entries = self.read_entries().await?;
        Ok(entries
            .get(TOKEN_KEY)
            .and_then(|v| v.as_str())
            .map(str::to_string))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn memory_store_overwrites() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        store.save("first").await.unwrap();
        store.save("second").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn file_store_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("fcm.json"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_creates_parent_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("fcm.json");

        FileTokenStore::new(&path).save("abc").await.unwrap();

        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.load().await.unwrap().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fcm.json");
        std::fs::write(&path, r#"{"token": "old", "locale": "en"}"#).unwrap();

        let store = FileTokenStore::new(&path);
        store.save("new").await.unwrap();

        let raw: HashMap<String, String> =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw.get("token").map(String::as_str), Some("new"));
        assert_eq!(raw.get("locale").map(String::as_str), Some("en"));
    }

    #[tokio::test]
    async fn file_store_keeps_non_string_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fcm.json");
        std::fs::write(&path, r#"{"token": "old", "launches": 3}"#).unwrap();

        let store = FileTokenStore::new(&path);
        store.save("new").await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["token"], "new");
        assert_eq!(raw["launches"], 3);
    }

    #[tokio::test]
    async fn file_store_recovers_from_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fcm.json");
        std::fs::write(&path, r#"{"token": "ol"#).unwrap();

        let store = FileTokenStore::new(&path);
        assert_matches!(store.load().await, Err(TokenStoreError::Json(_)));

        store.save("first").await.unwrap();
        store.save("second").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("second"));
        assert!(!dir.path().join("fcm.json.tmp").exists());
    }
}
