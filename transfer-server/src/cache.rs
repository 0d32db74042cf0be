//! Caching layer for timetable API responses.
//!
//! Route queries are keyed by their full request URL, which already carries
//! the anchor date and minute, so a repeated search within the TTL reuses the
//! earlier answer. Completions are keyed by (term, options) and live longer
//! since stop names rarely change.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::completion::{CompletionClient, CompletionOptions, Suggestion};
use crate::domain::ConnectionsResponse;
use crate::timetable::{ConnectionsRequest, TimetableClient, TimetableError};

/// Cache key for completions: (trimmed term, request flags).
type CompletionKey = (String, CompletionOptions);

/// Cached route response.
type RouteEntry = Arc<ConnectionsResponse>;

/// Cached completion list.
type CompletionEntry = Arc<Vec<Suggestion>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for route responses.
    pub route_ttl: Duration,

    /// TTL for completion lists.
    pub completion_ttl: Duration,

    /// Maximum number of entries per cache.
    pub max_capacity: u64,
}

impl CacheConfig {
    pub fn new() -> Self {
        Self {
            route_ttl: Duration::from_secs(60),
            completion_ttl: Duration::from_secs(5 * 60),
            max_capacity: 1000,
        }
    }

    pub fn with_route_ttl(mut self, ttl: Duration) -> Self {
        self.route_ttl = ttl;
        self
    }

    pub fn with_completion_ttl(mut self, ttl: Duration) -> Self {
        self.completion_ttl = ttl;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache for timetable API responses.
pub struct TimetableCache {
    /// Route responses, keyed by request URL.
    routes: MokaCache<String, RouteEntry>,

    /// Completion lists, keyed by (term, options).
    completions: MokaCache<CompletionKey, CompletionEntry>,
}

impl TimetableCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.route_ttl)
            .max_capacity(config.max_capacity)
            .build();
        let completions = MokaCache::builder()
            .time_to_live(config.completion_ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            routes,
            completions,
        }
    }

    pub async fn get_route(&self, url: &str) -> Option<RouteEntry> {
        self.routes.get(url).await
    }

    pub async fn insert_route(&self, url: String, entry: RouteEntry) {
        self.routes.insert(url, entry).await;
    }

    pub async fn get_completions(&self, key: &CompletionKey) -> Option<CompletionEntry> {
        self.completions.get(key).await
    }

    pub async fn insert_completions(&self, key: CompletionKey, entry: CompletionEntry) {
        self.completions.insert(key, entry).await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count() + self.completions.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
        self.completions.invalidate_all();
    }

    /// Apply pending inserts and evictions so counts are exact.
    pub async fn run_pending_tasks(&self) {
        self.routes.run_pending_tasks().await;
        self.completions.run_pending_tasks().await;
    }
}

/// Timetable and completion clients with caching.
///
/// Errors are never cached. Empty completion lists are not cached either,
/// since the completion client reports failures as an empty list.
pub struct CachedTimetableClient {
    timetable: TimetableClient,
    completion: CompletionClient,
    cache: TimetableCache,
}

impl CachedTimetableClient {
    /// Create a new cached client.
    pub fn new(
        timetable: TimetableClient,
        completion: CompletionClient,
        cache_config: &CacheConfig,
    ) -> Self {
        Self {
            timetable,
            completion,
            cache: TimetableCache::new(cache_config),
        }
    }

    /// Run a route query, using the cache if available.
    pub async fn get_connections(
        &self,
        request: &ConnectionsRequest,
    ) -> Result<RouteEntry, TimetableError> {
        let url = self.timetable.route_url(request);
        let key = url.to_string();

        if let Some(cached) = self.cache.get_route(&key).await {
            debug!(url = %key, "route cache hit");
            return Ok(cached);
        }

        let response = Arc::new(self.timetable.get_connections_at(url).await?);
        self.cache.insert_route(key, response.clone()).await;
        debug!(entries = self.cache.entry_count(), "route response cached");

        Ok(response)
    }

    /// Look up completions, using the cache if available.
    pub async fn fetch_completions(
        &self,
        term: &str,
        options: &CompletionOptions,
    ) -> CompletionEntry {
        let term = term.trim();
        if term.is_empty() {
            return Arc::new(Vec::new());
        }

        let key = (term.to_string(), *options);
        if let Some(cached) = self.cache.get_completions(&key).await {
            return cached;
        }

        let suggestions = Arc::new(self.completion.fetch_completions(term, options).await);
        if !suggestions.is_empty() {
            self.cache.insert_completions(key, suggestions.clone()).await;
        }

        suggestions
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}
