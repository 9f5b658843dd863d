//! Memoization of merged layout template sets.
//!
//! # Cache Behavior
//!
//! - Cache key: `<resource name>/<page name>`, or `<page name>` without a
//!   resource
//! - Insert if absent: when two requests build the same entry concurrently
//!   the first insert wins and both use it
//! - No automatic expiration (manual invalidation via `invalidate()`)
//! - Thread-safe concurrent access via `RwLock`

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::resolver::TemplateSet;

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;

/// Builds the cache key for a page of a resource.
pub fn cache_key(resource_name: &str, page_name: &str) -> String {
    if resource_name.is_empty() {
        page_name.to_string()
    } else {
        format!("{}/{}", resource_name, page_name)
    }
}

/// Snapshot of cache performance counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatistics {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cached_entries: usize,
}

impl CacheStatistics {
    /// Fraction of requests served from the cache, `0.0` before any request.
    pub fn hit_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_requests as f64
        }
    }
}

/// Process-wide store of compiled, layout-merged template sets.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: RwLock<HashMap<String, Arc<TemplateSet>>>,
    stats: RwLock<CacheStatistics>,
}

impl TemplateCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `key`, building and inserting it on a miss.
    ///
    /// `build` runs outside any lock.
    pub fn get_or_build<F>(&self, key: &str, build: F) -> Arc<TemplateSet>
    where
        F: FnOnce() -> TemplateSet,
    {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(set) = entries.get(key) {
                debug!("Layout cache hit: {}", key);
                let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
                stats.total_requests += 1;
                stats.cache_hits += 1;
                return Arc::clone(set);
            }
        }

        debug!("Layout cache miss: {}", key);
        {
            let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
            stats.total_requests += 1;
            stats.cache_misses += 1;
        }

        let built = Arc::new(build());

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let set = match entries.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                debug!("Layout for {} was cached concurrently, using that entry", key);
                Arc::clone(entry.get())
            }
            Entry::Vacant(entry) => {
                info!("Layout cached: {}", key);
                Arc::clone(entry.insert(built))
            }
        };
        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        stats.cached_entries = entries.len();

        set
    }

    /// The cached entry for `key`, without touching the statistics.
    pub fn get(&self, key: &str) -> Option<Arc<TemplateSet>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Removes one entry. Returns `true` if it was cached.
    pub fn invalidate(&self, key: &str) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let was_present = entries.remove(key).is_some();

        if was_present {
            let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
            stats.cached_entries = entries.len();
            debug!("Invalidated layout cache entry: {}", key);
        }

        was_present
    }

    /// Removes every entry. Statistics other than the entry count are kept.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();

        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        stats.cached_entries = 0;

        info!("All layout cache entries cleared");
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A snapshot of the performance counters.
    pub fn statistics(&self) -> CacheStatistics {
        *self.stats.read().unwrap_or_else(PoisonError::into_inner)
    }
}
