//! Text-node level change analysis between two document states.
//!
//! Nodes are compared by index, not aligned by content: inserting a paragraph in the middle
//! shows up as a run of `Modified` entries followed by an `Added` one. That is good enough to
//! answer "did any checkable text change?", which is what rescans need.

use crate::document::TextNode;

/// One difference between two text-node lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextNodeChange {
    /// The number of text nodes differs.
    CountChanged {
        /// Node count before.
        old: usize,
        /// Node count after.
        new: usize,
    },
    /// A node exists only in the new list.
    Added {
        /// Node index.
        index: usize,
        /// The new node.
        node: TextNode,
    },
    /// A node exists only in the old list.
    Removed {
        /// Node index.
        index: usize,
        /// The old node.
        node: TextNode,
    },
    /// A node's text changed.
    Modified {
        /// Node index.
        index: usize,
        /// Node before.
        old: TextNode,
        /// Node after.
        new: TextNode,
    },
}

/// Compare two text-node lists index by index.
///
/// Position-only shifts are not reported; only text differences, additions and removals are.
pub fn diff_text_nodes(old: &[TextNode], new: &[TextNode]) -> Vec<TextNodeChange> {
    let mut changes = Vec::new();
    if old.len() != new.len() {
        changes.push(TextNodeChange::CountChanged {
            old: old.len(),
            new: new.len(),
        });
    }

    for index in 0..old.len().max(new.len()) {
        match (old.get(index), new.get(index)) {
            (None, Some(node)) => changes.push(TextNodeChange::Added {
                index,
                node: node.clone(),
            }),
            (Some(node), None) => changes.push(TextNodeChange::Removed {
                index,
                node: node.clone(),
            }),
            (Some(a), Some(b)) if a.text != b.text => changes.push(TextNodeChange::Modified {
                index,
                old: a.clone(),
                new: b.clone(),
            }),
            _ => {}
        }
    }

    changes
}
