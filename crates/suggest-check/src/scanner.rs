//! Whole-document scans.
//!
//! A scan walks a [`DocumentSnapshot`], splits every checkable text node into sentences and
//! checks all of them concurrently. The scan resolves only after every check has settled;
//! failed checks contribute nothing. The order of the returned ranges is unspecified.

use crate::checker::SentenceChecker;
use crate::service::GrammarService;
use futures_util::future::join_all;
use std::sync::Arc;
use suggest_core::{DocumentSnapshot, ErrorRange, SuggestDocument, segment_sentences};
use tokio::sync::Semaphore;

/// Runs sentence checks over every text node of a document.
#[derive(Debug)]
pub struct DocumentScanner<S> {
    checker: Arc<SentenceChecker<S>>,
    limit: Option<Arc<Semaphore>>,
}

impl<S> Clone for DocumentScanner<S> {
    fn clone(&self) -> Self {
        Self {
            checker: Arc::clone(&self.checker),
            limit: self.limit.clone(),
        }
    }
}

impl<S: GrammarService> DocumentScanner<S> {
    /// Create a scanner without a concurrency limit.
    pub fn new(checker: Arc<SentenceChecker<S>>) -> Self {
        Self {
            checker,
            limit: None,
        }
    }

    /// Bound the number of in-flight checks. `None` (or zero) removes the bound.
    pub fn with_max_concurrent_requests(mut self, limit: Option<usize>) -> Self {
        self.limit = limit
            .filter(|n| *n > 0)
            .map(|n| Arc::new(Semaphore::new(n)));
        self
    }

    /// The sentence checker used by this scanner.
    pub fn checker(&self) -> &Arc<SentenceChecker<S>> {
        &self.checker
    }

    /// Scan a snapshot and return every error range found.
    pub async fn scan(&self, snapshot: &DocumentSnapshot) -> Vec<ErrorRange> {
        let checks = snapshot
            .text_nodes
            .iter()
            .filter(|node| node.is_checkable())
            .flat_map(|node| {
                segment_sentences(&node.text)
                    .into_iter()
                    .map(move |sentence| (sentence.text, node.pos + sentence.offset))
            })
            .map(|(text, anchor)| self.check_one(text, anchor));

        let results = join_all(checks).await;
        let ranges: Vec<ErrorRange> = results.into_iter().flatten().collect();
        tracing::debug!(
            version = snapshot.version,
            ranges = ranges.len(),
            "document scan finished"
        );
        ranges
    }

    /// Snapshot `doc` and scan it.
    pub async fn scan_document<D>(&self, doc: &D) -> Vec<ErrorRange>
    where
        D: SuggestDocument + ?Sized,
    {
        let snapshot = doc.snapshot();
        self.scan(&snapshot).await
    }

    async fn check_one(&self, text: String, anchor: usize) -> Vec<ErrorRange> {
        let _permit = match &self.limit {
            Some(semaphore) => semaphore.acquire().await.ok(),
            None => None,
        };
        self.checker.check_sentence(&text, anchor).await
    }
}
