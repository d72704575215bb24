//! LRU cache of compiled string patterns

use std::num::NonZeroUsize;
use std::sync::Arc;

use log::trace;
use lru::LruCache;
use parking_lot::Mutex;

use super::StringPattern;

/// Basic cache statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
}

impl CacheStats {
    /// Hit ratio as a percentage
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

struct Inner {
    entries: LruCache<String, Arc<StringPattern>>,
    stats: CacheStats,
}

/// Compiled-pattern cache keyed by pattern text.
///
/// Only successful compilations are cached; a pattern that fails to compile
/// is recompiled (and fails again) on every request.
pub struct PatternCache {
    inner: Option<Mutex<Inner>>,
}

impl PatternCache {
    /// Create a cache holding up to `capacity` patterns; 0 disables caching
    pub fn new(capacity: usize) -> Self {
        let inner = NonZeroUsize::new(capacity).map(|cap| {
            Mutex::new(Inner {
                entries: LruCache::new(cap),
                stats: CacheStats::default(),
            })
        });
        Self { inner }
    }

    /// Check if caching is enabled
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Compiled pattern for `source`, compiling on a miss
    pub fn get_or_compile(&self, source: &str) -> Result<Arc<StringPattern>, regex::Error> {
        let Some(inner) = &self.inner else {
            return StringPattern::new(source).map(Arc::new);
        };

        {
            let mut guard = inner.lock();
            if let Some(pattern) = guard.entries.get(source).cloned() {
                guard.stats.hits += 1;
                trace!("pattern cache hit: {source}");
                return Ok(pattern);
            }
            guard.stats.misses += 1;
        }

        trace!("pattern cache miss: {source}");
        let pattern = Arc::new(StringPattern::new(source)?);
        inner
            .lock()
            .entries
            .put(source.to_string(), Arc::clone(&pattern));
        Ok(pattern)
    }

    /// Snapshot of the hit/miss counters
    pub fn stats(&self) -> CacheStats {
        self.inner
            .as_ref()
            .map(|inner| inner.lock().stats)
            .unwrap_or_default()
    }

    /// Number of cached patterns
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| inner.lock().entries.len())
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached patterns and reset statistics
    pub fn clear(&self) {
        if let Some(inner) = &self.inner {
            let mut guard = inner.lock();
            guard.entries.clear();
            guard.stats = CacheStats::default();
        }
    }
}

impl std::fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCache")
            .field("enabled", &self.is_enabled())
            .field("len", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}
