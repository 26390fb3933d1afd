//! Atomic document edits and their structured results.
//!
//! A [`DocumentEdit`] is expressed in absolute document positions (chars). Applying one through
//! [`SuggestDocument::apply_edit`](crate::document::SuggestDocument::apply_edit) either succeeds
//! completely and yields an [`EditDelta`], or fails with an [`EditError`] and leaves the document
//! untouched.

use thiserror::Error;

/// A single atomic edit against a position range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEdit {
    /// Insert `text` at position `at`.
    Insert {
        /// Insertion position.
        at: usize,
        /// Text to insert (must be non-empty).
        text: String,
    },
    /// Remove `from..to`.
    Delete {
        /// Start position (inclusive).
        from: usize,
        /// End position (exclusive).
        to: usize,
    },
    /// Replace `from..to` with `text`.
    Replace {
        /// Start position (inclusive).
        from: usize,
        /// End position (exclusive).
        to: usize,
        /// Replacement text (must be non-empty).
        text: String,
    },
}

impl DocumentEdit {
    /// The pre-edit range touched by this edit. Inserts yield an empty range.
    pub fn range(&self) -> (usize, usize) {
        match self {
            Self::Insert { at, .. } => (*at, *at),
            Self::Delete { from, to } | Self::Replace { from, to, .. } => (*from, *to),
        }
    }

    /// Text inserted by this edit (empty for deletes).
    pub fn inserted_text(&self) -> &str {
        match self {
            Self::Insert { text, .. } | Self::Replace { text, .. } => text,
            Self::Delete { .. } => "",
        }
    }
}

/// What an applied edit actually changed.
///
/// Semantics follow a single text splice: starting at `start`, `deleted_text` was removed and
/// `inserted_text` put in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDelta {
    /// Start position of the splice.
    pub start: usize,
    /// Exact deleted text (may be empty).
    pub deleted_text: String,
    /// Exact inserted text (may be empty).
    pub inserted_text: String,
    /// Document version after the edit.
    pub version: u64,
}

impl EditDelta {
    /// Length of `deleted_text` in characters.
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    /// Length of `inserted_text` in characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Exclusive end position in the pre-edit document.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.deleted_len())
    }
}

/// Reasons an edit cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The position does not fall inside any text-bearing block.
    #[error("invalid position {0}")]
    InvalidPosition(usize),
    /// The range is inverted or exceeds the document.
    #[error("invalid range {from}..{to}")]
    InvalidRange {
        /// Start position.
        from: usize,
        /// End position.
        to: usize,
    },
    /// The range spans more than one block.
    #[error("range {from}..{to} crosses a block boundary")]
    CrossesBlockBoundary {
        /// Start position.
        from: usize,
        /// End position.
        to: usize,
    },
    /// Empty text nodes are not allowed.
    #[error("text cannot be empty")]
    EmptyText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_ranges_and_text() {
        let insert = DocumentEdit::Insert {
            at: 4,
            text: "abc".to_string(),
        };
        assert_eq!(insert.range(), (4, 4));
        assert_eq!(insert.inserted_text(), "abc");

        let delete = DocumentEdit::Delete { from: 2, to: 6 };
        assert_eq!(delete.range(), (2, 6));
        assert_eq!(delete.inserted_text(), "");
    }

    #[test]
    fn test_delta_end_counts_chars() {
        let delta = EditDelta {
            start: 3,
            deleted_text: "né".to_string(),
            inserted_text: "ne".to_string(),
            version: 1,
        };
        assert_eq!(delta.deleted_len(), 2);
        assert_eq!(delta.end(), 5);
    }
}
