#![warn(missing_docs)]
//! Suggest Core - position reconciliation and suggestion lifecycle for grammar-check overlays
//!
//! # Overview
//!
//! `suggest-core` sits between a rich-text document and a remote grammar checker. It does not
//! talk to the network (see `suggest-check`) and it does not render anything. It owns the parts
//! with real invariants:
//!
//! - splitting text nodes into sentences with exact char offsets
//! - mapping sentence-relative action spans onto absolute document positions
//! - tracking dismissed suggestions by identity key
//! - building highlight sets that are valid for exactly one document version
//! - turning an accepted suggestion into one atomic document edit
//!
//! # Pipeline
//!
//! ```text
//! text nodes ─► segment_sentences ─► (remote check) ─► error_ranges ─► build_decorations
//!                                                           ▲                   │
//!                                              IgnoredErrors│                   ▼
//!                                                           │      highlight under cursor
//!                                                  ignore ◄─┴─► apply_suggestion ─► DocumentEdit
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use suggest_core::{
//!     CheckResponse, IgnoredErrors, RichDocument, SuggestDocument, SYNTAX_ERROR_CLASS,
//!     apply_suggestion, build_decorations, error_ranges, segment_sentences,
//! };
//! use serde_json::json;
//!
//! let mut doc = RichDocument::from_paragraphs(["The cta sat."]);
//! let node = doc.text_nodes().remove(0);
//! let sentence = segment_sentences(&node.text).remove(0);
//!
//! // What the remote checker answered for `sentence.text`.
//! let response = CheckResponse::new(vec![json!({
//!     "action": "$REPLACE_cat", "token_start": 4, "token_end": 7,
//!     "original": "cta", "real_replacement": "cat",
//! })]);
//!
//! let ranges = error_ranges(&response, node.pos + sentence.offset, &IgnoredErrors::new());
//! let highlights = build_decorations(&doc, &ranges, SYNTAX_ERROR_CLASS);
//! let decoration = highlights.at(6)[0].clone();
//!
//! apply_suggestion(&mut doc, &decoration.action, decoration.range);
//! assert_eq!(doc.text(), "The cat sat.");
//! ```
//!
//! # Module Description
//!
//! - [`segmenter`] - sentence splitting
//! - [`action`] - checker payloads, decoded actions, identity keys, error ranges
//! - [`ignored`] - dismissed-suggestion registry
//! - [`document`] - host document interface and shared handle
//! - [`rich_text`] - in-memory paragraph/run document
//! - [`decorations`] - highlight sets
//! - [`edit`] - atomic edits and deltas
//! - [`apply`] - accepted suggestion to edit
//! - [`changes`] - text-node change analysis
//! - [`popover`] - popover card model and collaborator trait
//! - [`word_highlight`] - word-level fallback renderer for plain text containers

pub mod action;
pub mod apply;
pub mod changes;
pub mod decorations;
pub mod document;
pub mod edit;
pub mod ignored;
pub mod popover;
pub mod rich_text;
pub mod segmenter;
pub mod word_highlight;

pub use action::{
    APPEND_PREFIX, ActionKind, CheckResponse, DELETE_TAG, ErrorKey, ErrorRange, RawAction,
    SuggestionAction, error_ranges,
};
pub use apply::{apply_suggestion, suggestion_edit};
pub use changes::{TextNodeChange, diff_text_nodes};
pub use decorations::{
    Decoration, DecorationRange, DecorationSet, SYNTAX_ERROR_CLASS, build_decorations,
    is_valid_range,
};
pub use document::{DocumentSnapshot, SharedDocument, SuggestDocument, TextNode};
pub use edit::{DocumentEdit, EditDelta, EditError};
pub use ignored::IgnoredErrors;
pub use popover::{
    CardKind, ConfidenceLevel, Rect, SuggestionCard, SuggestionPopover, anchor_rect,
};
pub use rich_text::{RichDocument, TextRun};
pub use segmenter::{SentenceUnit, segment_sentences};
pub use word_highlight::{HighlightContainer, Segment, escape_html, highlight_suggestions};
