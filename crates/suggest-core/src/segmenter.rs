//! Sentence segmentation for text nodes.
//!
//! A text node is split at runs of terminal punctuation (`.`, `!`, `?`). Each run ends one
//! sentence, so `?!` or `...` produce a single boundary. Whatever follows the last run becomes
//! the final sentence.
//!
//! Offsets are measured in Unicode scalar values (`char`), matching the document position model.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static TERMINAL_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("terminal punctuation pattern is valid"));

/// A trimmed sentence extracted from a text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceUnit {
    /// Sentence text with surrounding whitespace removed.
    pub text: String,
    /// Char offset of the first char of `text` within the source text.
    pub offset: usize,
    /// Untrimmed char span of the sentence within the source text.
    ///
    /// Consecutive spans tile the source text: every char belongs to exactly one span unless the
    /// text is blank.
    pub span: Range<usize>,
}

impl SentenceUnit {
    /// Length of the trimmed text in chars.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split `text` into sentence units.
pub fn segment_sentences(text: &str) -> Vec<SentenceUnit> {
    let mut sentences = Vec::new();
    let mut last_byte = 0usize;
    let mut last_char = 0usize;

    for m in TERMINAL_PUNCTUATION.find_iter(text) {
        let end_char = last_char + text[last_byte..m.end()].chars().count();
        push_sentence(&mut sentences, &text[last_byte..m.end()], last_char..end_char);
        last_byte = m.end();
        last_char = end_char;
    }

    if last_byte < text.len() {
        let end_char = last_char + text[last_byte..].chars().count();
        push_sentence(&mut sentences, &text[last_byte..], last_char..end_char);
    }

    sentences
}

fn push_sentence(out: &mut Vec<SentenceUnit>, raw: &str, span: Range<usize>) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        // Trailing whitespace stays with the previous sentence so spans still cover the text.
        if let Some(previous) = out.last_mut() {
            previous.span.end = span.end;
        }
        return;
    }

    let leading = raw.chars().take_while(|c| c.is_whitespace()).count();
    out.push(SentenceUnit {
        text: trimmed.to_string(),
        offset: span.start + leading,
        span,
    });
}
