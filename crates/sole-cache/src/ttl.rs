//! Time-bounded cache entries.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::kv::Cache;
use crate::CacheError;

/// Default lifetime of a cached entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Current wall-clock time in Unix milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// A value stamped with the time it was stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timestamped<T> {
    /// Unix milliseconds.
    pub stored_at_ms: i64,
    pub value: T,
}

impl<T> Timestamped<T> {
    pub fn new(value: T, stored_at_ms: i64) -> Self {
        Self {
            stored_at_ms,
            value,
        }
    }

    /// Whether the entry is younger than `ttl` at `now_ms`.
    ///
    /// Entries stamped in the future count as fresh.
    pub fn is_fresh(&self, now_ms: i64, ttl: Duration) -> bool {
        let age = now_ms.saturating_sub(self.stored_at_ms);
        age < ttl.as_millis() as i64
    }
}

/// Cache whose reads ignore entries older than a fixed TTL.
///
/// Missing, expired and corrupt entries all read as `None`; only backend
/// failures surface as errors.
#[derive(Debug, Clone)]
pub struct TtlCache {
    cache: Cache,
    ttl: Duration,
}

impl TtlCache {
    pub fn new(cache: Cache, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Cache with [`DEFAULT_TTL`].
    pub fn with_default_ttl(cache: Cache) -> Self {
        Self::new(cache, DEFAULT_TTL)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`, if any.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        self.get_at(key, now_millis()).await
    }

    /// Fresh value for `key` as of `now_ms`.
    pub async fn get_at<T: DeserializeOwned>(
        &self,
        key: &str,
        now_ms: i64,
    ) -> Result<Option<T>, CacheError> {
        Ok(self
            .get_entry::<T>(key)
            .await?
            .filter(|entry| entry.is_fresh(now_ms, self.ttl))
            .map(|entry| entry.value))
    }

    /// Stored entry regardless of age; corrupt entries read as `None`.
    pub async fn get_entry<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<Timestamped<T>>, CacheError> {
        let Some(raw) = self.cache.get_raw(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                tracing::debug!(key, error = %e, "ignoring corrupt cache entry");
                Ok(None)
            }
        }
    }

    /// Store `value` stamped with the current time.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        self.set_at(key, value, now_millis()).await
    }

    /// Store `value` stamped with `now_ms`.
    pub async fn set_at<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        now_ms: i64,
    ) -> Result<(), CacheError> {
        self.cache
            .set(key, &Timestamped::new(value, now_ms))
            .await
    }

    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.cache.delete(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_736_109_000_000;

    #[test]
    fn test_freshness_boundary() {
        let entry = Timestamped::new(1, T0);
        let ttl = Duration::from_secs(300);
        assert!(entry.is_fresh(T0, ttl));
        assert!(entry.is_fresh(T0 + 299_999, ttl));
        assert!(!entry.is_fresh(T0 + 300_000, ttl));
        assert!(entry.is_fresh(T0 - 1_000, ttl));
    }

    #[tokio::test]
    async fn test_fresh_entry_is_returned() {
        let cache = TtlCache::with_default_ttl(Cache::memory());
        cache.set_at("units", &vec!["A", "B"], T0).await.unwrap();

        let hit: Option<Vec<String>> = cache.get_at("units", T0 + 60_000).await.unwrap();
        assert_eq!(hit, Some(vec!["A".to_string(), "B".to_string()]));
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_missing() {
        let cache = TtlCache::with_default_ttl(Cache::memory());
        cache.set_at("units", &vec![1, 2], T0).await.unwrap();

        let miss: Option<Vec<i32>> = cache.get_at("units", T0 + 301_000).await.unwrap();
        assert_eq!(miss, None);

        let entry: Option<Timestamped<Vec<i32>>> = cache.get_entry("units").await.unwrap();
        assert_eq!(entry.map(|e| e.stored_at_ms), Some(T0));
    }

    #[tokio::test]
    async fn test_corrupt_entry_reads_as_missing() {
        let raw = Cache::memory();
        raw.set_raw("units", "[1,2,3]").await.unwrap();
        let cache = TtlCache::with_default_ttl(raw);

        let miss: Option<Vec<i32>> = cache.get("units").await.unwrap();
        assert_eq!(miss, None);
    }
}
