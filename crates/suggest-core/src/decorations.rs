//! Inline highlight decorations for suggestions.
//!
//! A [`DecorationSet`] is derived state: it is built from one document version and a list of
//! [`ErrorRange`]s, and is never patched in place. Whenever either input changes the set must be
//! rebuilt with [`build_decorations`].
//!
//! Ranges that do not fit the document (`to > size`, or `from >= to`) are dropped with a warning
//! instead of failing the whole set.

use crate::action::{ErrorRange, SuggestionAction};
use crate::document::SuggestDocument;

/// Default CSS class applied to suggestion highlights.
pub const SYNTAX_ERROR_CLASS: &str = "syntax-error-highlight";

/// A half-open position range (`from..to`) in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationRange {
    /// Start position (inclusive).
    pub from: usize,
    /// End position (exclusive).
    pub to: usize,
}

impl DecorationRange {
    /// Create a new range.
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Whether `pos` lies inside the range.
    pub fn contains(&self, pos: usize) -> bool {
        self.from <= pos && pos < self.to
    }
}

/// One inline highlight and the suggestion it represents.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    /// Highlighted range.
    pub range: DecorationRange,
    /// CSS class (or host-defined style name).
    pub class: String,
    /// Suggestion payload, retrieved when the user interacts with the highlight.
    pub action: SuggestionAction,
}

/// Immutable set of highlights tied to one document version.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationSet {
    doc_version: u64,
    /// Sorted by `(from, to)`.
    decorations: Vec<Decoration>,
    /// `prefix_max_end[i] = max(decorations[0..=i].range.to)`, used to prune point queries.
    prefix_max_end: Vec<usize>,
}

impl DecorationSet {
    /// An empty set for `doc_version`.
    pub fn empty(doc_version: u64) -> Self {
        Self {
            doc_version,
            decorations: Vec::new(),
            prefix_max_end: Vec::new(),
        }
    }

    pub(crate) fn from_decorations(doc_version: u64, mut decorations: Vec<Decoration>) -> Self {
        decorations.sort_by_key(|d| d.range);
        let mut max_end = 0usize;
        let prefix_max_end = decorations
            .iter()
            .map(|d| {
                max_end = max_end.max(d.range.to);
                max_end
            })
            .collect();
        Self {
            doc_version,
            decorations,
            prefix_max_end,
        }
    }

    /// Document version the set was built against.
    pub fn doc_version(&self) -> u64 {
        self.doc_version
    }

    /// Number of decorations.
    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    /// Returns `true` if the set holds no decorations.
    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    /// Decorations in position order.
    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter()
    }

    /// All decorations covering `pos`.
    pub fn at(&self, pos: usize) -> Vec<&Decoration> {
        // First index whose start is past `pos`; everything before it starts at or before `pos`.
        let idx = self.decorations.partition_point(|d| d.range.from <= pos);

        let mut out = Vec::new();
        for i in (0..idx).rev() {
            if self.prefix_max_end[i] <= pos {
                break;
            }
            let decoration = &self.decorations[i];
            if decoration.range.contains(pos) {
                out.push(decoration);
            }
        }
        out.reverse();
        out
    }
}

/// Whether `from..to` is a usable highlight range in a document of `size` positions.
pub fn is_valid_range(from: usize, to: usize, size: usize) -> bool {
    to <= size && from < to
}

/// Build the highlight set for `doc` from `ranges`.
pub fn build_decorations<D>(doc: &D, ranges: &[ErrorRange], class: &str) -> DecorationSet
where
    D: SuggestDocument + ?Sized,
{
    let size = doc.size();
    let mut decorations = Vec::with_capacity(ranges.len());

    for range in ranges {
        if !is_valid_range(range.from, range.to, size) {
            tracing::warn!(
                from = range.from,
                to = range.to,
                doc_size = size,
                "dropping invalid suggestion range"
            );
            continue;
        }

        decorations.push(Decoration {
            range: DecorationRange::new(range.from, range.to),
            class: class.to_string(),
            action: range.action.clone(),
        });
    }

    DecorationSet::from_decorations(doc.version(), decorations)
}
