use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::core::AppError;

/// Identifies a cached query, e.g. `["myApplications", "ada@example.com"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryKey(segments.into_iter().map(Into::into).collect())
    }

    pub fn root(name: &str) -> Self {
        QueryKey(vec![name.to_string()])
    }

    pub fn with(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    /// A key matches every key it is a prefix of.
    pub fn is_prefix_of(&self, other: &QueryKey) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }
}

impl Display for QueryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[derive(Debug)]
struct CacheEntry {
    data: Value,
    updated_at: Instant,
    ttl: Duration,
    invalidated: bool,
}

impl CacheEntry {
    fn is_fresh(&self) -> bool {
        !self.invalidated && self.updated_at.elapsed() < self.ttl
    }
}

/// Client-side copy of server collections, keyed by query.
///
/// Values are stored as JSON so that one cache can hold every entity type.
pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, CacheEntry>>,
    // Bumped by `clear` while the write lock is held.
    epoch: AtomicU64,
    default_ttl: Duration,
}

impl QueryCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            epoch: AtomicU64::new(0),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Return the cached value while it is fresh, otherwise run `fetcher`
    /// and cache its result. Failed fetches leave the cache untouched, and so
    /// does a fetch that was still running when the cache was cleared.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        self.fetch_with_ttl(key, self.default_ttl, fetcher).await
    }

    pub async fn fetch_with_ttl<T, F, Fut>(
        &self,
        key: QueryKey,
        ttl: Duration,
        fetcher: F,
    ) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        if let Some(data) = self.fresh_value(&key).await {
            tracing::debug!(key = %key, "query cache hit");
            return Ok(serde_json::from_value(data)?);
        }

        tracing::debug!(key = %key, "query cache miss");
        let started_in = self.epoch.load(Ordering::SeqCst);
        let fetched = fetcher().await?;
        let data = serde_json::to_value(&fetched)?;

        let mut entries = self.entries.write().await;
        if self.epoch.load(Ordering::SeqCst) != started_in {
            tracing::debug!(key = %key, "cache cleared during fetch, result not stored");
            return Ok(fetched);
        }
        entries.insert(
            key,
            CacheEntry {
                data,
                updated_at: Instant::now(),
                ttl,
                invalidated: false,
            },
        );
        Ok(fetched)
    }

    /// Cached data regardless of freshness.
    pub async fn get_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>, AppError> {
        match self.entries.read().await.get(key) {
            Some(entry) => Ok(Some(serde_json::from_value(entry.data.clone())?)),
            None => Ok(None),
        }
    }

    pub async fn set_data<T: Serialize>(&self, key: QueryKey, data: &T) -> Result<(), AppError> {
        let data = serde_json::to_value(data)?;
        self.put_raw(key, data).await;
        Ok(())
    }

    /// Mark every query under `prefix` stale; the next read refetches.
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.write().await;
        let mut count = 0;
        for (key, entry) in entries.iter_mut() {
            if prefix.is_prefix_of(key) {
                entry.invalidated = true;
                count += 1;
            }
        }
        tracing::debug!(prefix = %prefix, count, "invalidated queries");
        count
    }

    pub async fn is_fresh(&self, key: &QueryKey) -> bool {
        self.entries
            .read()
            .await
            .get(key)
            .map(CacheEntry::is_fresh)
            .unwrap_or(false)
    }

    pub async fn remove(&self, key: &QueryKey) {
        self.entries.write().await.remove(key);
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        self.epoch.fetch_add(1, Ordering::SeqCst);
        entries.clear();
    }

    pub(crate) async fn raw(&self, key: &QueryKey) -> Option<Value> {
        self.entries.read().await.get(key).map(|e| e.data.clone())
    }

    /// Keeps the entry's TTL but resets its age; a missing entry gets the default.
    pub(crate) async fn put_raw(&self, key: QueryKey, data: Value) {
        let mut entries = self.entries.write().await;
        let ttl = entries.get(&key).map(|e| e.ttl).unwrap_or(self.default_ttl);
        entries.insert(
            key,
            CacheEntry {
                data,
                updated_at: Instant::now(),
                ttl,
                invalidated: false,
            },
        );
    }

    async fn fresh_value(&self, key: &QueryKey) -> Option<Value> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh())
            .map(|entry| entry.data.clone())
    }
}
