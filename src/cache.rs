//! Exact-string memoization of generation results
//!
//! Maps a submitted passage (literal string, no normalization) to the text
//! the remote service previously returned, so an identical repeat submission
//! never re-invokes the remote call. Unbounded, never evicted; lifetime is
//! the process lifetime. Acceptable because expected volume is interactive
//! and single-user.
//!
//! Only successful results are stored. Caching error strings would pin a
//! transient failure to a passage until restart, so errors always propagate
//! uncached.

use crate::error::AppResult;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Result of a cache lookup-or-compute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOutcome {
    text: String,
    hit: bool,
}

impl CacheOutcome {
    /// Wrap a value computed without consulting the cache (caching disabled)
    pub fn fresh(text: String) -> Self {
        Self { text, hit: false }
    }

    /// The generated (or previously cached) text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the outcome, yielding the text
    pub fn into_text(self) -> String {
        self.text
    }

    /// True if the value came from the cache without a remote call
    pub fn hit(&self) -> bool {
        self.hit
    }
}

/// Process-wide memoization of passage → generated text
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: Mutex<HashMap<String, String>>,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Return the cached value for `key`, or run `compute` and store its result
    ///
    /// The lock is held only around map access, never across the compute
    /// future, so a slow remote call does not serialize unrelated lookups.
    /// Concurrent first submissions of the same key may therefore both
    /// compute; the second insert wins harmlessly. Single-user interactive
    /// usage never hits that window in practice.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> AppResult<CacheOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<String>>,
    {
        if let Some(cached) = self.entries.lock().await.get(key).cloned() {
            tracing::debug!(key_length = key.len(), "Cache hit, skipping remote call");
            return Ok(CacheOutcome {
                text: cached,
                hit: true,
            });
        }

        let text = compute().await?;

        self.entries
            .lock()
            .await
            .insert(key.to_string(), text.clone());
        tracing::debug!(
            key_length = key.len(),
            value_length = text.len(),
            "Cached generation result"
        );

        Ok(CacheOutcome { text, hit: false })
    }
}
