use lru::LruCache;
use std::num::NonZeroUsize;
use tokio::sync::RwLock;

use crate::classifier::{Classification, ClassificationEngine, DecisionTier};
use crate::dialogue::ContextEntry;
use crate::error::ClassifyError;

const DEFAULT_CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(v) => v,
    None => unreachable!(),
};

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    url: String,
    domain: String,
}

/// Classification engine with an LRU cache keyed by (url, domain).
///
/// Entries live until evicted. Context is not part of the key. Fail-closed
/// verdicts are not cached so a transient outage does not stick.
pub struct CachedClassifier {
    engine: ClassificationEngine,
    cache: RwLock<LruCache<CacheKey, Classification>>,
}

impl CachedClassifier {
    #[must_use]
    pub fn new(engine: ClassificationEngine, cache_size: usize) -> Self {
        let cache_size = NonZeroUsize::new(cache_size).unwrap_or(DEFAULT_CACHE_SIZE);
        Self {
            engine,
            cache: RwLock::new(LruCache::new(cache_size)),
        }
    }

    #[must_use]
    pub fn engine(&self) -> &ClassificationEngine {
        &self.engine
    }

    /// Cached [`ClassificationEngine::classify`]
    ///
    /// # Errors
    ///
    /// Returns caller errors from the engine; those are never cached.
    pub async fn classify(
        &self,
        url: &str,
        domain: &str,
        context: &[ContextEntry],
    ) -> Result<bool, ClassifyError> {
        Ok(self.classify_full(url, domain, context).await?.productive)
    }

    /// Cached [`ClassificationEngine::classify_full`]
    ///
    /// # Errors
    ///
    /// Returns caller errors from the engine; those are never cached.
    pub async fn classify_full(
        &self,
        url: &str,
        domain: &str,
        context: &[ContextEntry],
    ) -> Result<Classification, ClassifyError> {
        let key = CacheKey {
            url: url.to_string(),
            domain: domain.to_string(),
        };

        // LruCache::get updates recency, so it needs the write lock
        if let Some(cached) = self.cache.write().await.get(&key) {
            log::debug!("Cache hit for '{url}' in '{domain}'");
            return Ok(*cached);
        }

        let result = self.engine.classify_full(url, domain, context).await?;
        if result.tier != DecisionTier::FailedClosed {
            self.cache.write().await.put(key, result);
        }
        Ok(result)
    }

    /// Number of cached verdicts
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }
}
