//! Key-value stores with automatic JSON serialization.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::CacheError;

/// File name of the document a [`FileStore`] keeps in its directory.
pub const STORE_FILE: &str = "store.json";

/// String key-value backend.
///
/// Every call is a suspension point; callers must tolerate missing keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get a value, or `None` if the key doesn't exist.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Set a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Remove a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// In-process store; contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Store persisted as one JSON document in a directory.
///
/// Writes go to a temporary file that is renamed over the document, so a
/// crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open (or create) the store in `dir`.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| CacheError::OpenError(format!("{}: {}", dir.display(), e)))?;

        let path = dir.join(STORE_FILE);
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => HashMap::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "discarding unreadable store");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(CacheError::OpenError(format!("{}: {}", path.display(), e))),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> Result<(), CacheError> {
        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        // Memory only changes once the document is on disk.
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }
}

/// Type-safe cache over any [`KeyValueStore`].
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl Cache {
    /// Wrap a backend.
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// In-memory cache.
    pub fn memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// File-backed cache in `dir`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open("/home/kasir/.local/share/sole").await?;
    /// ```
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        Ok(Self::new(FileStore::open(dir).await?))
    }

    /// Get a raw string value.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.store.get(key).await
    }

    /// Set a raw string value.
    pub async fn set_raw(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.store.set(key, value).await
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let prefs: Option<Preferences> = cache.get("prefs").await?;
    /// ```
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw).await
    }

    /// Delete a value from the cache.
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove(key).await
    }

    /// Check if a key exists in the cache.
    pub async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.store.get(key).await?.is_some())
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = cache_key!("catalog", search, size);
/// // Returns "catalog:nike:42"
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        dark_mode: bool,
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_typed_cache() {
        let cache = Cache::memory();
        cache.set("prefs", &Prefs { dark_mode: true }).await.unwrap();

        let prefs: Option<Prefs> = cache.get("prefs").await.unwrap();
        assert_eq!(prefs, Some(Prefs { dark_mode: true }));
        assert!(cache.exists("prefs").await.unwrap());

        cache.delete("prefs").await.unwrap();
        assert!(!cache.exists("prefs").await.unwrap());
    }

    #[tokio::test]
    async fn test_typed_cache_reports_corrupt_values() {
        let cache = Cache::memory();
        cache.set_raw("prefs", "{not json").await.unwrap();
        let result: Result<Option<Prefs>, _> = cache.get("prefs").await;
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }

    #[tokio::test]
    async fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let store = FileStore::open(dir.path()).await.unwrap();
        store.set("token", "abc").await.unwrap();
        store.set("other", "x").await.unwrap();
        store.remove("other").await.unwrap();
        drop(store);

        let reopened = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.get("token").await.unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get("other").await.unwrap(), None);
        assert!(!dir.path().join("store.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_store_failed_write_keeps_memory_in_sync() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        store.set("token", "abc").await.unwrap();

        // A directory in place of the temp file makes every write fail.
        std::fs::create_dir(dir.path().join("store.json.tmp")).unwrap();

        assert!(store.set("token", "xyz").await.is_err());
        assert!(store.set("other", "x").await.is_err());
        assert!(store.remove("token").await.is_err());
        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("abc"));
        assert_eq!(store.get("other").await.unwrap(), None);

        std::fs::remove_dir(dir.path().join("store.json.tmp")).unwrap();
        let reopened = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.get("token").await.unwrap().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_file_store_recovers_from_garbage() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORE_FILE), "garbage").unwrap();

        let store = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(store.get("token").await.unwrap(), None);
    }

    #[test]
    fn test_cache_key_macro() {
        let key = cache_key!("catalog", "nike", 42);
        assert_eq!(key, "catalog:nike:42");
    }
}
