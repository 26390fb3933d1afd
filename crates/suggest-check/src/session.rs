//! Suggestion session: ties scanning, highlights, the popover and user actions together.
//!
//! A session is shared by everything that works on one editor: it owns the response cache and
//! the ignored-error registry, and it hands highlight sets to the document only when they still
//! describe the document's current state.
//!
//! # Stale results
//!
//! Every [`SuggestionSession::refresh`] takes a new generation number. With
//! `discard_stale_scans` enabled, a scan that finishes after a newer one started, or after the
//! document was edited, is dropped instead of painting highlights at positions that may no
//! longer be right.

use crate::cache::SuggestionCache;
use crate::checker::SentenceChecker;
use crate::config::SuggestConfig;
use crate::scanner::DocumentScanner;
use crate::service::GrammarService;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use suggest_core::{
    DecorationRange, EditDelta, IgnoredErrors, SharedDocument, SuggestDocument, SuggestionAction,
    SuggestionCard, SuggestionPopover, TextNode, apply_suggestion, build_decorations,
    diff_text_nodes,
};

/// Result of a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new highlight set was installed.
    Applied {
        /// Number of highlights in the new set.
        highlights: usize,
    },
    /// A newer refresh started while this one was scanning.
    Superseded,
    /// The document was edited while this refresh was scanning.
    DocumentChanged,
    /// The document refused the highlight set.
    Rejected,
    /// No checkable text changed, nothing was scanned.
    Unchanged,
}

/// One editor's suggestion state.
pub struct SuggestionSession<S> {
    scanner: DocumentScanner<S>,
    config: SuggestConfig,
    generation: AtomicU64,
    popover: Mutex<Option<Box<dyn SuggestionPopover>>>,
}

impl<S> std::fmt::Debug for SuggestionSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionSession")
            .field("config", &self.config)
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<S: GrammarService> SuggestionSession<S> {
    /// Create a session with a fresh cache and ignore registry.
    pub fn new(service: S, config: SuggestConfig) -> Self {
        Self::with_state(service, SuggestionCache::new(), IgnoredErrors::new(), config)
    }

    /// Create a session over existing cache and ignore registry.
    pub fn with_state(
        service: S,
        cache: SuggestionCache,
        ignored: IgnoredErrors,
        config: SuggestConfig,
    ) -> Self {
        let checker = Arc::new(SentenceChecker::new(service, cache, ignored));
        let scanner = DocumentScanner::new(checker)
            .with_max_concurrent_requests(config.max_concurrent_requests);
        Self {
            scanner,
            config,
            generation: AtomicU64::new(0),
            popover: Mutex::new(None),
        }
    }

    /// Attach the popover used by [`open_at`](Self::open_at).
    pub fn with_popover(self, popover: impl SuggestionPopover + 'static) -> Self {
        *self.popover.lock().unwrap_or_else(PoisonError::into_inner) = Some(Box::new(popover));
        self
    }

    /// Session configuration.
    pub fn config(&self) -> &SuggestConfig {
        &self.config
    }

    /// The scanner.
    pub fn scanner(&self) -> &DocumentScanner<S> {
        &self.scanner
    }

    /// The sentence checker.
    pub fn checker(&self) -> &SentenceChecker<S> {
        self.scanner.checker()
    }

    /// The response cache.
    pub fn cache(&self) -> &SuggestionCache {
        self.checker().cache()
    }

    /// The ignored-error registry.
    pub fn ignored(&self) -> &IgnoredErrors {
        self.checker().ignored()
    }

    /// Scan `doc` and install the resulting highlights.
    pub async fn refresh<D: SuggestDocument>(&self, doc: &SharedDocument<D>) -> RefreshOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = doc.with(|d| d.snapshot());
        let ranges = self.scanner.scan(&snapshot).await;

        let discard = self.config.discard_stale_scans;
        if discard && self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "discarding superseded scan");
            return RefreshOutcome::Superseded;
        }

        doc.with(|d| {
            if discard && d.version() != snapshot.version {
                tracing::debug!(
                    scanned = snapshot.version,
                    current = d.version(),
                    "discarding scan of an edited document"
                );
                return RefreshOutcome::DocumentChanged;
            }
            let set = build_decorations(d, &ranges, &self.config.highlight_class);
            let highlights = set.len();
            if d.set_highlights(set) {
                RefreshOutcome::Applied { highlights }
            } else {
                RefreshOutcome::Rejected
            }
        })
    }

    /// Refresh only if the document's text differs from `previous`.
    pub async fn refresh_if_changed<D: SuggestDocument>(
        &self,
        doc: &SharedDocument<D>,
        previous: &[TextNode],
    ) -> RefreshOutcome {
        let current = doc.with(|d| d.text_nodes());
        if diff_text_nodes(previous, &current).is_empty() {
            return RefreshOutcome::Unchanged;
        }
        self.refresh(doc).await
    }

    /// Show the card of the first highlight covering `pos`.
    ///
    /// Returns `false` when there is nothing at `pos` or no popover is attached.
    pub fn open_at<D: SuggestDocument>(&self, doc: &SharedDocument<D>, pos: usize) -> bool {
        let card = doc.with(|d| {
            d.highlights().and_then(|set| {
                set.at(pos)
                    .first()
                    .map(|hit| SuggestionCard::new(&hit.action, hit.range))
            })
        });
        let Some(card) = card else {
            return false;
        };

        let mut popover = self.popover.lock().unwrap_or_else(PoisonError::into_inner);
        match popover.as_mut() {
            Some(popover) => {
                popover.show(card);
                true
            }
            None => false,
        }
    }

    /// Accept `action`: apply it as one edit and close the popover.
    pub fn apply<D: SuggestDocument>(
        &self,
        doc: &SharedDocument<D>,
        action: &SuggestionAction,
        range: DecorationRange,
    ) -> Option<EditDelta> {
        let delta = doc.with(|d| apply_suggestion(d, action, range));
        self.hide_popover();
        delta
    }

    /// Dismiss `action` for the rest of the session and refresh highlights.
    pub async fn ignore<D: SuggestDocument>(
        &self,
        doc: &SharedDocument<D>,
        action: &SuggestionAction,
    ) -> RefreshOutcome {
        let key = action.key();
        if self.ignored().ignore(key.clone()) {
            tracing::debug!(key = %key, "ignoring suggestion");
        }
        self.hide_popover();
        self.refresh(doc).await
    }

    /// Close the popover, if one is attached.
    pub fn hide_popover(&self) {
        if let Some(popover) = self
            .popover
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            popover.hide();
        }
    }
}
