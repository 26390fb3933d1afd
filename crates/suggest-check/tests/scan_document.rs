use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use suggest_check::{CheckError, DocumentScanner, GrammarService, SentenceChecker, SuggestionCache};
use suggest_core::{CheckResponse, ErrorKey, IgnoredErrors, RichDocument, SuggestDocument, TextNode};

/// Answers from a fixed table and counts remote calls. Unknown sentences fail.
#[derive(Default)]
struct TableService {
    answers: HashMap<String, Vec<Value>>,
    calls: AtomicUsize,
}

impl TableService {
    fn with(mut self, sentence: &str, actions: Vec<Value>) -> Self {
        self.answers.insert(sentence.to_string(), actions);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GrammarService for TableService {
    async fn check(&self, sentence: &str) -> Result<CheckResponse, CheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .get(sentence)
            .map(|actions| CheckResponse::new(actions.clone()))
            .ok_or_else(|| CheckError::Other(format!("no answer for {sentence:?}")))
    }
}

fn cta() -> Value {
    json!({
        "action": "$REPLACE_cat", "token_start": 4, "token_end": 7,
        "original": "cta", "real_replacement": "cat", "confidence": 0.9
    })
}

fn scanner(
    service: Arc<TableService>,
    ignored: IgnoredErrors,
) -> DocumentScanner<Arc<TableService>> {
    let checker = SentenceChecker::new(service, SuggestionCache::new(), ignored);
    DocumentScanner::new(Arc::new(checker))
}

fn spans(mut ranges: Vec<suggest_core::ErrorRange>) -> Vec<(usize, usize)> {
    ranges.sort_by_key(|r| (r.from, r.to));
    ranges.into_iter().map(|r| (r.from, r.to)).collect()
}

#[tokio::test]
async fn test_identical_paragraphs_share_one_request() {
    let service = Arc::new(TableService::default().with("The cta sat.", vec![cta()]));
    let scanner = scanner(Arc::clone(&service), IgnoredErrors::new());

    // Second paragraph text starts after "The cta sat." plus close and open tokens.
    let doc = RichDocument::from_paragraphs(["The cta sat.", "The cta sat."]);
    let ranges = scanner.scan_document(&doc).await;

    assert_eq!(spans(ranges), vec![(5, 8), (19, 22)]);
    assert_eq!(service.calls(), 1);
    assert_eq!(scanner.checker().service().calls(), 1);
    assert_eq!(scanner.checker().cache().len(), 1);
}

#[tokio::test]
async fn test_rescan_is_served_from_cache() {
    let service = Arc::new(TableService::default().with("The cta sat.", vec![cta()]));
    let scanner = scanner(Arc::clone(&service), IgnoredErrors::new());
    let doc = RichDocument::from_paragraphs(["The cta sat."]);

    let first = scanner.scan_document(&doc).await;
    let second = scanner.scan_document(&doc).await;
    assert_eq!(first, second);
    assert_eq!(service.calls(), 1);
}

#[tokio::test]
async fn test_sentences_are_anchored_at_their_offset() {
    let service = Arc::new(
        TableService::default()
            .with("Fine.", Vec::new())
            .with("The cta sat.", vec![cta()]),
    );
    let scanner = scanner(service, IgnoredErrors::new());
    let doc = RichDocument::from_paragraphs(["Fine. The cta sat."]);

    // "The cta sat." starts at char 6 of a node at position 1.
    assert_eq!(spans(scanner.scan_document(&doc).await), vec![(11, 14)]);
}

#[tokio::test]
async fn test_failed_sentence_contributes_nothing() {
    let service = Arc::new(TableService::default().with("The cta sat.", vec![cta()]));
    let scanner = scanner(Arc::clone(&service), IgnoredErrors::new());
    let doc = RichDocument::from_paragraphs(["Unknown text. The cta sat."]);

    assert_eq!(spans(scanner.scan_document(&doc).await), vec![(19, 22)]);
    assert_eq!(service.calls(), 2);
    // The failure is not cached.
    assert_eq!(scanner.checker().cache().len(), 1);
}

#[tokio::test]
async fn test_whitespace_only_nodes_are_skipped() {
    let service = Arc::new(TableService::default());
    let scanner = scanner(Arc::clone(&service), IgnoredErrors::new());
    let snapshot = suggest_core::DocumentSnapshot {
        version: 0,
        size: 8,
        text_nodes: vec![TextNode::new(1, "   "), TextNode::new(6, "")],
    };

    assert!(scanner.scan(&snapshot).await.is_empty());
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn test_ignored_suggestions_are_filtered() {
    let service = Arc::new(TableService::default().with("The cta sat.", vec![cta()]));
    let ignored = IgnoredErrors::new();
    ignored.ignore(ErrorKey::new(5, 8, "cta"));
    let scanner = scanner(service, ignored);

    let doc = RichDocument::from_paragraphs(["The cta sat.", "The cta sat."]);
    assert_eq!(doc.text_nodes().len(), 2);
    assert_eq!(spans(scanner.scan_document(&doc).await), vec![(19, 22)]);
}

#[tokio::test]
async fn test_concurrency_limit_still_checks_every_sentence() {
    let service = Arc::new(
        TableService::default()
            .with("A cta.", Vec::new())
            .with("B cta.", Vec::new())
            .with("C cta.", Vec::new()),
    );
    let checker = SentenceChecker::new(
        Arc::clone(&service),
        SuggestionCache::new(),
        IgnoredErrors::new(),
    );
    let scanner = DocumentScanner::new(Arc::new(checker)).with_max_concurrent_requests(Some(1));
    let doc = RichDocument::from_paragraphs(["A cta. B cta.", "C cta."]);

    assert!(scanner.scan_document(&doc).await.is_empty());
    assert_eq!(service.calls(), 3);
}
