//! Session-scoped cache of checker responses, keyed by trimmed sentence text.
//!
//! The key is the exact trimmed text, nothing else: the same sentence appearing in two places
//! in a document shares one entry. Concurrent lookups of a key that is still being fetched wait
//! for the in-flight request instead of issuing their own. Failed fetches are not cached and leave
//! no entry behind, so the next lookup retries.
//!
//! Entries are never evicted.

use crate::error::CheckError;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use suggest_core::CheckResponse;
use tokio::sync::OnceCell;

type Slot = Arc<OnceCell<Arc<CheckResponse>>>;

/// Shared response cache. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct SuggestionCache {
    entries: Arc<Mutex<HashMap<String, Slot>>>,
}

impl SuggestionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &str) -> Slot {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key.to_string()).or_default())
    }

    /// Return the cached response for `text`, or run `fetch` to produce it.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        text: &str,
        fetch: F,
    ) -> Result<Arc<CheckResponse>, CheckError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CheckResponse, CheckError>>,
    {
        let key = text.trim();
        let slot = self.slot(key);
        if let Some(hit) = slot.get() {
            tracing::debug!(sentence = key, "checker cache hit");
            return Ok(Arc::clone(hit));
        }

        match slot.get_or_try_init(|| async { fetch().await.map(Arc::new) }).await {
            Ok(response) => Ok(Arc::clone(response)),
            Err(err) => {
                self.evict_empty(key, &slot);
                Err(err)
            }
        }
    }

    /// Drop `slot` from the map if it is still the entry for `key` and holds nothing.
    fn evict_empty(&self, key: &str, slot: &Slot) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let stale = entries
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && !current.initialized());
        if stale {
            entries.remove(key);
        }
    }

    /// Cached response for `text`, if any.
    pub fn get(&self, text: &str) -> Option<Arc<CheckResponse>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(text.trim()).and_then(|slot| slot.get().cloned())
    }

    /// Store `response` for `text` unless an entry already exists.
    pub fn insert(&self, text: &str, response: CheckResponse) {
        // An existing entry wins; cached responses are immutable for the session.
        let _ = self.slot(text.trim()).set(Arc::new(response));
    }

    /// Number of cached responses.
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|slot| slot.initialized()).count()
    }

    /// Returns `true` if no response is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let cache = SuggestionCache::new();
        let calls = AtomicUsize::new(0);

        for text in ["The cta sat.", "  The cta sat. "] {
            let response = cache
                .get_or_fetch(text, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(CheckResponse::new(Vec::new()))
                })
                .await
                .unwrap();
            assert!(response.actions.is_empty());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("The cta sat.").is_some());
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = SuggestionCache::new();
        let failed = cache
            .get_or_fetch("x", || async { Err(CheckError::Other("down".to_string())) })
            .await;
        assert!(failed.is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.entries.lock().unwrap().len(), 0);

        let ok = cache
            .get_or_fetch("x", || async { Ok(CheckResponse::new(Vec::new())) })
            .await;
        assert!(ok.is_ok());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_failures_leave_no_entries() {
        let cache = SuggestionCache::new();
        for n in 0..5 {
            let text = format!("broken sentence {n}.");
            let result = cache
                .get_or_fetch(&text, || async { Err(CheckError::Other("down".to_string())) })
                .await;
            assert!(result.is_err());
        }
        assert_eq!(cache.entries.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_insert_does_not_overwrite() {
        let cache = SuggestionCache::new();
        cache.insert("a", CheckResponse::new(Vec::new()));
        cache.insert("a", CheckResponse::new(vec![serde_json::json!({"action": "$DELETE"})]));
        assert!(cache.get("a").unwrap().actions.is_empty());
    }
}
