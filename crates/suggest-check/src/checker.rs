//! Per-sentence checking with caching and ignore filtering.

use crate::cache::SuggestionCache;
use crate::error::CheckError;
use crate::service::GrammarService;
use std::sync::Arc;
use suggest_core::{CheckResponse, ErrorRange, IgnoredErrors, error_ranges};

/// Checks sentences against a [`GrammarService`] through a [`SuggestionCache`].
#[derive(Debug)]
pub struct SentenceChecker<S> {
    service: S,
    cache: SuggestionCache,
    ignored: IgnoredErrors,
}

impl<S: GrammarService> SentenceChecker<S> {
    /// Create a checker over explicit session state.
    pub fn new(service: S, cache: SuggestionCache, ignored: IgnoredErrors) -> Self {
        Self {
            service,
            cache,
            ignored,
        }
    }

    /// The response cache.
    pub fn cache(&self) -> &SuggestionCache {
        &self.cache
    }

    /// The ignored-error registry consulted when parsing responses.
    pub fn ignored(&self) -> &IgnoredErrors {
        &self.ignored
    }

    /// The underlying service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Fetch the raw response for `text`, using the cache.
    pub async fn fetch(&self, text: &str) -> Result<Arc<CheckResponse>, CheckError> {
        self.cache
            .get_or_fetch(text, || self.service.check(text))
            .await
    }

    /// Check `text` and anchor the resulting ranges at `anchor`.
    ///
    /// Never fails: a failed check is logged and yields no ranges.
    pub async fn check_sentence(&self, text: &str, anchor: usize) -> Vec<ErrorRange> {
        match self.fetch(text).await {
            Ok(response) => error_ranges(&response, anchor, &self.ignored),
            Err(err) => {
                tracing::warn!(sentence = text, anchor, "sentence check failed: {err}");
                Vec::new()
            }
        }
    }
}
