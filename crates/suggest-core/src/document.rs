//! The structured-document collaborator interface.
//!
//! The suggestion pipeline does not own a document model. It needs a host document that can:
//!
//! - enumerate its text-bearing nodes with their absolute positions
//! - slice a position range for inspection
//! - apply an atomic insert/delete/replace edit
//! - accept a set of position-tagged inline highlights
//!
//! [`SuggestDocument`] captures exactly that. [`RichDocument`](crate::rich_text::RichDocument)
//! is the in-crate implementation used by tests and headless hosts.

use crate::decorations::DecorationSet;
use crate::edit::{DocumentEdit, EditDelta, EditError};
use std::sync::{Arc, Mutex, PoisonError};

/// A text-bearing node and its absolute position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    /// Position of the node's first char.
    pub pos: usize,
    /// Node text.
    pub text: String,
}

impl TextNode {
    /// Create a text node.
    pub fn new(pos: usize, text: impl Into<String>) -> Self {
        Self {
            pos,
            text: text.into(),
        }
    }

    /// Whether the node has any non-whitespace content worth checking.
    pub fn is_checkable(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Owned copy of the parts of a document a scan needs.
///
/// Scans run across awaits, so they work from a snapshot rather than borrowing the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    /// Document version the snapshot was taken at.
    pub version: u64,
    /// Document size in positions.
    pub size: usize,
    /// Text nodes in document order.
    pub text_nodes: Vec<TextNode>,
}

/// Host document consumed by the suggestion pipeline.
pub trait SuggestDocument {
    /// Monotonic version, bumped on every content change.
    fn version(&self) -> u64;

    /// Size of the document content in positions.
    fn size(&self) -> usize;

    /// Text nodes with their absolute positions, in document order.
    fn text_nodes(&self) -> Vec<TextNode>;

    /// Text between two positions, or `None` if the range is invalid.
    fn text_between(&self, from: usize, to: usize) -> Option<String>;

    /// Apply one atomic edit.
    fn apply_edit(&mut self, edit: &DocumentEdit) -> Result<EditDelta, EditError>;

    /// Replace the rendered highlight set.
    ///
    /// Returns `false` if the host rejected the set (e.g. it was built for another version).
    fn set_highlights(&mut self, highlights: DecorationSet) -> bool;

    /// Currently rendered highlights.
    fn highlights(&self) -> Option<&DecorationSet>;

    /// Take an owned snapshot for scanning.
    fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            version: self.version(),
            size: self.size(),
            text_nodes: self.text_nodes(),
        }
    }
}

/// Shared handle to a host document.
///
/// The lock is only taken for synchronous sections (snapshot, edit, dispatch) and never held
/// across an await, so the host can keep editing while checks are in flight.
#[derive(Debug, Default)]
pub struct SharedDocument<D> {
    inner: Arc<Mutex<D>>,
}

impl<D> Clone for SharedDocument<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D> SharedDocument<D> {
    /// Wrap a document.
    pub fn new(doc: D) -> Self {
        Self {
            inner: Arc::new(Mutex::new(doc)),
        }
    }

    /// Run `f` with exclusive access to the document.
    pub fn with<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
