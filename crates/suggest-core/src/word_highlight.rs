//! Word-level suggestion highlighting for plain text containers.
//!
//! This is the fallback path for hosts without a structured document: the container holds a
//! flat list of [`Segment`]s and the remote actions address **words**, not chars.
//!
//! Words are maximal runs of non-whitespace; an action's `start..end` counts words only
//! (whitespace tokens are never indexed). Append actions mark the last word of their range
//! (`end - 1`), since the insertion lands after it. Whitespace is preserved verbatim when
//! highlights are applied or removed.

use crate::action::{CheckResponse, RawAction};
use regex::Regex;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+|\S+").expect("token pattern is valid"));

/// CSS class of highlighted words.
pub const SUGGESTION_CLASS: &str = "suggestion";

/// A piece of container content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text.
    Text(String),
    /// A highlighted word and the serialized action it belongs to.
    Highlight {
        /// Highlighted text.
        text: String,
        /// Action payload as JSON text.
        action_json: String,
    },
}

impl Segment {
    /// Text content of the segment.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Highlight { text, .. } => text,
        }
    }
}

/// A plain text container whose words can be wrapped in highlights.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightContainer {
    segments: Vec<Segment>,
}

impl HighlightContainer {
    /// Create a container holding `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let segments = if text.is_empty() {
            Vec::new()
        } else {
            vec![Segment::Text(text)]
        };
        Self { segments }
    }

    /// Current segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Concatenated text of all segments.
    pub fn text_content(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    /// Highlighted segments only.
    pub fn highlights(&self) -> impl Iterator<Item = &Segment> {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Highlight { .. }))
    }

    /// Replace every highlight with its plain text.
    pub fn unwrap_highlights(&mut self) {
        let text = self.text_content();
        *self = Self::new(text);
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Segment::Text(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Text(text.to_string()));
        }
    }

    /// Render as HTML, escaping text and attribute values.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => html.push_str(&escape_html(text)),
                Segment::Highlight { text, action_json } => {
                    html.push_str(&format!(
                        "<span class=\"{SUGGESTION_CLASS}\" data-action='{}'>{}</span>",
                        escape_html(action_json),
                        escape_html(text)
                    ));
                }
            }
        }
        html
    }
}

/// Escape `&`, `<`, `>`, `"` and `'` for HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Word indices (into non-whitespace tokens) marked by `action`.
fn marked_words(action: &RawAction, word_count: usize) -> std::ops::Range<usize> {
    let (Some(start), Some(end)) = (action.start, action.end) else {
        return 0..0;
    };
    if action.kind().is_append() {
        return match end.checked_sub(1) {
            Some(last) if last < word_count => last..last + 1,
            _ => 0..0,
        };
    }
    start.min(word_count)..end.min(word_count)
}

/// Re-render `container` with the highlights described by `response`.
///
/// Existing highlights are removed first. When several actions mark the same word, the later
/// action wins.
pub fn highlight_suggestions(container: &mut HighlightContainer, response: &CheckResponse) {
    container.unwrap_highlights();
    let text = container.text_content();

    let tokens: Vec<&str> = TOKEN.find_iter(&text).map(|m| m.as_str()).collect();
    let word_count = tokens
        .iter()
        .filter(|t| !t.starts_with(char::is_whitespace))
        .count();

    let mut marks: Vec<Option<String>> = vec![None; word_count];
    for action in response.decoded_actions() {
        let range = marked_words(&action, word_count);
        if range.is_empty() {
            continue;
        }
        let json = serde_json::to_string(&action).unwrap_or_else(|_| "{}".to_string());
        for slot in &mut marks[range] {
            *slot = Some(json.clone());
        }
    }

    let mut rebuilt = HighlightContainer::default();
    let mut word_idx = 0usize;
    for token in tokens {
        if token.starts_with(char::is_whitespace) {
            rebuilt.push_text(token);
            continue;
        }
        match marks[word_idx].take() {
            Some(action_json) => rebuilt.segments.push(Segment::Highlight {
                text: token.to_string(),
                action_json,
            }),
            None => rebuilt.push_text(token),
        }
        word_idx += 1;
    }
    *container = rebuilt;
}
