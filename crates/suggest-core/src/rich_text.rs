//! A small structured document implementing [`SuggestDocument`].
//!
//! # Position model
//!
//! A [`RichDocument`] is a sequence of paragraphs, each holding text runs (adjacent runs differ
//! in their marks, e.g. bold/italic). Positions count chars, plus one position for each
//! paragraph's opening and closing boundary:
//!
//! ```text
//! <p>Hi there</p><p>Bye</p>
//! 0 1        9 10 11   14 15
//! ```
//!
//! so the first paragraph's text starts at position 1, and the document size is the sum of
//! `text_len + 2` over all paragraphs. Edits must stay inside a single paragraph's text.
//!
//! Run text is stored in [`ropey::Rope`]s, which gives char-indexed inserts/removals.

use crate::decorations::DecorationSet;
use crate::document::{SuggestDocument, TextNode};
use crate::edit::{DocumentEdit, EditDelta, EditError};
use ropey::Rope;

/// A run of text sharing the same marks.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    text: Rope,
    marks: Vec<String>,
}

impl TextRun {
    /// Create a run with `marks`.
    pub fn new(text: &str, marks: &[&str]) -> Self {
        Self {
            text: Rope::from_str(text),
            marks: marks.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Run text.
    pub fn text(&self) -> String {
        self.text.to_string()
    }

    /// Marks applied to the run.
    pub fn marks(&self) -> &[String] {
        &self.marks
    }

    fn len(&self) -> usize {
        self.text.len_chars()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Paragraph {
    runs: Vec<TextRun>,
}

impl Paragraph {
    fn text_len(&self) -> usize {
        self.runs.iter().map(TextRun::len).sum()
    }

    fn size(&self) -> usize {
        self.text_len() + 2
    }

    fn text(&self) -> String {
        self.runs.iter().map(TextRun::text).collect()
    }

    fn slice(&self, start: usize, end: usize) -> String {
        let mut out = String::new();
        let mut run_start = 0usize;
        for run in &self.runs {
            let run_end = run_start + run.len();
            let a = start.max(run_start);
            let b = end.min(run_end);
            if a < b {
                out.extend(run.text.slice(a - run_start..b - run_start).chars());
            }
            run_start = run_end;
        }
        out
    }

    /// Insert at a char offset within the paragraph text. Caller guarantees `offset <= text_len`.
    fn insert(&mut self, offset: usize, text: &str) {
        let mut run_start = 0usize;
        for run in &mut self.runs {
            let run_end = run_start + run.len();
            if offset <= run_end {
                run.text.insert(offset - run_start, text);
                return;
            }
            run_start = run_end;
        }
        self.runs.push(TextRun::new(text, &[]));
    }

    /// Remove `start..end` (paragraph-relative). Caller guarantees the range is in bounds.
    fn remove(&mut self, start: usize, end: usize) {
        let mut run_start = 0usize;
        for run in &mut self.runs {
            let run_end = run_start + run.len();
            let a = start.max(run_start);
            let b = end.min(run_end);
            if a < b {
                run.text.remove(a - run_start..b - run_start);
            }
            run_start = run_end;
        }
        self.runs.retain(|run| run.len() > 0);
    }
}

/// In-memory paragraph/run document with versioning and a highlight slot.
#[derive(Debug, Clone, Default)]
pub struct RichDocument {
    paragraphs: Vec<Paragraph>,
    version: u64,
    highlights: Option<DecorationSet>,
}

impl RichDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document with one single-run paragraph per entry.
    pub fn from_paragraphs<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut doc = Self::new();
        for text in paragraphs {
            doc.push_paragraph(vec![TextRun::new(text.as_ref(), &[])]);
        }
        doc
    }

    /// Append a paragraph made of `runs`. Empty runs are dropped.
    pub fn push_paragraph(&mut self, runs: Vec<TextRun>) {
        let runs = runs.into_iter().filter(|run| run.len() > 0).collect();
        self.paragraphs.push(Paragraph { runs });
        self.version += 1;
        self.highlights = None;
    }

    /// Number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Text of paragraph `index`.
    pub fn paragraph_text(&self, index: usize) -> Option<String> {
        self.paragraphs.get(index).map(Paragraph::text)
    }

    /// Plain text with paragraphs joined by `\n`.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Find the paragraph whose text range contains `pos` (inclusive of its end).
    ///
    /// Returns `(paragraph index, offset within paragraph text)`.
    fn locate(&self, pos: usize) -> Option<(usize, usize)> {
        let mut start = 0usize;
        for (idx, paragraph) in self.paragraphs.iter().enumerate() {
            let text_start = start + 1;
            let text_end = text_start + paragraph.text_len();
            if (text_start..=text_end).contains(&pos) {
                return Some((idx, pos - text_start));
            }
            start += paragraph.size();
        }
        None
    }

    /// Resolve `from..to` to one paragraph and paragraph-relative offsets.
    fn locate_range(&self, from: usize, to: usize) -> Result<(usize, usize, usize), EditError> {
        if from >= to || to > self.size() {
            return Err(EditError::InvalidRange { from, to });
        }
        let (start_idx, start) = self.locate(from).ok_or(EditError::InvalidPosition(from))?;
        let (end_idx, end) = self.locate(to).ok_or(EditError::InvalidPosition(to))?;
        if start_idx != end_idx {
            return Err(EditError::CrossesBlockBoundary { from, to });
        }
        Ok((start_idx, start, end))
    }

    fn commit(&mut self, start: usize, deleted_text: String, inserted_text: String) -> EditDelta {
        self.version += 1;
        self.highlights = None;
        EditDelta {
            start,
            deleted_text,
            inserted_text,
            version: self.version,
        }
    }
}

impl SuggestDocument for RichDocument {
    fn version(&self) -> u64 {
        self.version
    }

    fn size(&self) -> usize {
        self.paragraphs.iter().map(Paragraph::size).sum()
    }

    fn text_nodes(&self) -> Vec<TextNode> {
        let mut nodes = Vec::new();
        let mut start = 0usize;
        for paragraph in &self.paragraphs {
            let mut pos = start + 1;
            for run in &paragraph.runs {
                nodes.push(TextNode::new(pos, run.text()));
                pos += run.len();
            }
            start += paragraph.size();
        }
        nodes
    }

    fn text_between(&self, from: usize, to: usize) -> Option<String> {
        if from > to || to > self.size() {
            return None;
        }
        let mut out = String::new();
        let mut start = 0usize;
        for paragraph in &self.paragraphs {
            let text_start = start + 1;
            let text_end = text_start + paragraph.text_len();
            let a = from.max(text_start);
            let b = to.min(text_end);
            if a < b {
                out.push_str(&paragraph.slice(a - text_start, b - text_start));
            }
            start += paragraph.size();
        }
        Some(out)
    }

    fn apply_edit(&mut self, edit: &DocumentEdit) -> Result<EditDelta, EditError> {
        match edit {
            DocumentEdit::Insert { at, text } => {
                if text.is_empty() {
                    return Err(EditError::EmptyText);
                }
                let (idx, offset) = self.locate(*at).ok_or(EditError::InvalidPosition(*at))?;
                self.paragraphs[idx].insert(offset, text);
                Ok(self.commit(*at, String::new(), text.clone()))
            }
            DocumentEdit::Delete { from, to } => {
                let (idx, start, end) = self.locate_range(*from, *to)?;
                let deleted = self.paragraphs[idx].slice(start, end);
                self.paragraphs[idx].remove(start, end);
                Ok(self.commit(*from, deleted, String::new()))
            }
            DocumentEdit::Replace { from, to, text } => {
                if text.is_empty() {
                    return Err(EditError::EmptyText);
                }
                let (idx, start, end) = self.locate_range(*from, *to)?;
                let paragraph = &mut self.paragraphs[idx];
                let deleted = paragraph.slice(start, end);
                paragraph.remove(start, end);
                paragraph.insert(start, text);
                Ok(self.commit(*from, deleted, text.clone()))
            }
        }
    }

    fn set_highlights(&mut self, highlights: DecorationSet) -> bool {
        if highlights.doc_version() != self.version {
            tracing::warn!(
                set_version = highlights.doc_version(),
                doc_version = self.version,
                "rejecting highlights built for another document version"
            );
            return false;
        }
        self.highlights = Some(highlights);
        true
    }

    fn highlights(&self) -> Option<&DecorationSet> {
        self.highlights.as_ref()
    }
}
