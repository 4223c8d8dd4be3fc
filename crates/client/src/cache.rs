//! Client-side response caching
//!
//! Successful search responses are cached under the full parameter tuple.
//! Freshness is judged against `tokio::time::Instant`, so entries age with the
//! runtime clock. Stale entries are skipped on lookup and removed by
//! [`ResponseCache::sweep`].

use moka::future::Cache;
use questsearch_core::{SearchData, SortField, SortOrder};
use std::sync::Arc;
use std::time::Duration;
use tokio::{task::JoinHandle, time::Instant};
use tracing::debug;

use crate::params::SearchParams;

/// Cache key built from every parameter that affects a response
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct SearchCacheKey {
    pub query: String,
    pub page: u32,
    pub limit: u32,
    pub types: String,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl From<&SearchParams> for SearchCacheKey {
    fn from(params: &SearchParams) -> Self {
        Self {
            query: params.query.clone(),
            page: params.page,
            limit: params.limit,
            types: params.types.join(","),
            sort_field: params.sort_field,
            sort_order: params.sort_order,
        }
    }
}

/// A cached response and the moment it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: SearchData,
    pub cached_at: Instant,
}

impl CacheEntry {
    pub fn new(data: SearchData) -> Self {
        Self {
            data,
            cached_at: Instant::now(),
        }
    }

    /// Whether the entry is younger than `ttl`
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() < ttl
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct ResponseCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
    /// Age after which an entry is no longer served
    pub ttl: Duration,
}

impl Default for ResponseCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1000,
            ttl: Duration::from_secs(300),
        }
    }
}

/// Response cache shared between coordinators
pub struct ResponseCache {
    cache: Cache<SearchCacheKey, CacheEntry>,
    config: ResponseCacheConfig,
}

impl ResponseCache {
    pub fn new(config: ResponseCacheConfig) -> Self {
        let cache = Cache::builder().max_capacity(config.max_capacity).build();
        Self { cache, config }
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Raw lookup, regardless of age
    pub async fn get(&self, key: &SearchCacheKey) -> Option<CacheEntry> {
        self.cache.get(key).await
    }

    /// Cached data for `key` if it is still fresh
    pub async fn get_fresh(&self, key: &SearchCacheKey) -> Option<SearchData> {
        self.cache
            .get(key)
            .await
            .filter(|entry| entry.is_fresh(self.config.ttl))
            .map(|entry| entry.data)
    }

    pub async fn insert(&self, key: SearchCacheKey, data: SearchData) {
        self.cache.insert(key, CacheEntry::new(data)).await;
    }

    pub async fn invalidate(&self, key: &SearchCacheKey) {
        self.cache.invalidate(key).await;
    }

    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    /// Remove every entry older than the TTL; returns how many were removed
    pub async fn sweep(&self) -> usize {
        let stale: Vec<Arc<SearchCacheKey>> = self
            .cache
            .iter()
            .filter(|(_, entry)| !entry.is_fresh(self.config.ttl))
            .map(|(key, _)| key)
            .collect();

        for key in &stale {
            self.cache.invalidate(key.as_ref()).await;
        }
        if !stale.is_empty() {
            debug!("Swept {} stale cache entries", stale.len());
        }
        stale.len()
    }

    /// Approximate number of entries
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

/// Thread-safe shared cache
pub type SharedResponseCache = Arc<ResponseCache>;

/// Create a shared cache
pub fn create_shared_cache(config: ResponseCacheConfig) -> SharedResponseCache {
    Arc::new(ResponseCache::new(config))
}

/// Spawn a task that sweeps `cache` every TTL
///
/// The task runs until the returned handle is aborted.
pub fn spawn_sweeper(cache: SharedResponseCache) -> JoinHandle<()> {
    let period = cache.ttl();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            cache.sweep().await;
        }
    })
}
