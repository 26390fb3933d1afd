//! Popover content and the popover collaborator interface.
//!
//! The host owns the actual tooltip widget. This module prepares what it shows
//! ([`SuggestionCard`]), where it is anchored ([`anchor_rect`]), and the trait the session uses
//! to open and dismiss it ([`SuggestionPopover`]).

use crate::action::{ActionKind, SuggestionAction};
use crate::decorations::DecorationRange;

/// Which kind of edit a card proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    /// Text will be added after the highlight.
    Append,
    /// The highlighted text will be removed.
    Delete,
    /// The highlighted text will be replaced.
    Replace,
}

impl CardKind {
    /// Headline shown at the top of the card.
    pub fn headline(self) -> &'static str {
        match self {
            Self::Append => "Add suggestion",
            Self::Delete => "Delete suggestion",
            Self::Replace => "Replace suggestion",
        }
    }

    /// Label of the apply button.
    pub fn apply_label(self) -> &'static str {
        match self {
            Self::Append => "Add",
            Self::Delete => "Delete",
            Self::Replace => "Replace",
        }
    }
}

impl From<&ActionKind> for CardKind {
    fn from(kind: &ActionKind) -> Self {
        match kind {
            ActionKind::Append(_) => Self::Append,
            ActionKind::Delete => Self::Delete,
            ActionKind::Replace(_) => Self::Replace,
        }
    }
}

/// Coarse confidence bucket, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    /// `>= 0.8`
    High,
    /// `>= 0.6`
    Medium,
    /// Anything lower.
    Low,
}

impl ConfidenceLevel {
    /// Bucket a confidence in `0.0..=1.0`.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            Self::High
        } else if confidence >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// CSS class for the bucket.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::High => "confidence-high",
            Self::Medium => "confidence-medium",
            Self::Low => "confidence-low",
        }
    }
}

/// Everything a popover needs to describe one suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionCard {
    /// Proposed edit kind.
    pub kind: CardKind,
    /// Text the suggestion refers to. Append cards use a generic "here".
    pub context: String,
    /// Text to insert or substitute, if any.
    pub replacement: Option<String>,
    /// Confidence rounded to a whole percentage.
    pub confidence_percent: Option<u8>,
    /// Confidence bucket.
    pub confidence_level: Option<ConfidenceLevel>,
    /// Highlight the card belongs to.
    pub range: DecorationRange,
}

impl SuggestionCard {
    /// Build the card for `action` shown over `range`.
    pub fn new(action: &SuggestionAction, range: DecorationRange) -> Self {
        let kind = CardKind::from(&action.kind);
        let context = match kind {
            CardKind::Append => "here".to_string(),
            CardKind::Delete | CardKind::Replace => action.original().to_string(),
        };
        let replacement = match &action.kind {
            ActionKind::Append(text) | ActionKind::Replace(text) => Some(text.clone()),
            ActionKind::Delete => None,
        };
        // A zero confidence is treated as absent.
        let confidence = action.raw.confidence.filter(|c| *c > 0.0);

        Self {
            kind,
            context,
            replacement,
            confidence_percent: confidence.map(|c| (c.clamp(0.0, 1.0) * 100.0).round() as u8),
            confidence_level: confidence.map(ConfidenceLevel::from_confidence),
            range,
        }
    }

    /// Headline shown at the top of the card.
    pub fn headline(&self) -> &'static str {
        self.kind.headline()
    }

    /// Label of the apply button.
    pub fn apply_label(&self) -> &'static str {
        self.kind.apply_label()
    }
}

/// A screen rectangle in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Rect {
    /// Width of the rectangle.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Popover anchor spanning from the caret box at `from` to the caret box at `to`.
///
/// Returns `None` when the result is degenerate (zero width and height), which happens when the
/// host cannot measure the positions; callers fall back to the highlight element's own box.
pub fn anchor_rect(start: Rect, end: Rect) -> Option<Rect> {
    let rect = Rect {
        left: start.left,
        top: start.top,
        right: end.right,
        bottom: end.bottom,
    };
    if rect.width() == 0.0 && rect.height() == 0.0 {
        None
    } else {
        Some(rect)
    }
}

/// Tooltip collaborator used to present suggestions.
pub trait SuggestionPopover: Send {
    /// Show `card` anchored to its highlight, replacing any open popover.
    fn show(&mut self, card: SuggestionCard);

    /// Dismiss the open popover, if any.
    fn hide(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{CheckResponse, SuggestionAction};
    use serde_json::json;

    fn action(value: serde_json::Value) -> SuggestionAction {
        let raw = CheckResponse::new(vec![value]).decoded_actions().next().unwrap();
        SuggestionAction::resolve(raw, 0).unwrap()
    }

    #[test]
    fn test_replace_card() {
        let action = action(json!({
            "action": "$REPLACE_cat", "token_start": 0, "token_end": 3,
            "original": "cta", "real_replacement": "cat", "confidence": 0.734
        }));
        let card = SuggestionCard::new(&action, DecorationRange::new(0, 3));
        assert_eq!(card.kind, CardKind::Replace);
        assert_eq!(card.context, "cta");
        assert_eq!(card.replacement.as_deref(), Some("cat"));
        assert_eq!(card.confidence_percent, Some(73));
        assert_eq!(card.confidence_level, Some(ConfidenceLevel::Medium));
        assert_eq!(card.apply_label(), "Replace");
    }

    #[test]
    fn test_append_and_delete_cards() {
        let append = action(json!({
            "action": "$APPEND_,", "token_start": 0, "token_end": 4, "original": "Well", "real_replacement": ","
        }));
        let card = SuggestionCard::new(&append, DecorationRange::new(0, 4));
        assert_eq!(card.context, "here");
        assert_eq!(card.confidence_level, None);

        let delete = action(json!({
            "action": "$DELETE", "token_start": 0, "token_end": 3, "original": "the", "confidence": 0.95
        }));
        let card = SuggestionCard::new(&delete, DecorationRange::new(0, 3));
        assert_eq!(card.replacement, None);
        assert_eq!(card.headline(), "Delete suggestion");
        assert_eq!(
            card.confidence_level.map(ConfidenceLevel::css_class),
            Some("confidence-high")
        );
    }

    #[test]
    fn test_anchor_rect_rejects_degenerate_boxes() {
        let zero = Rect {
            left: 0.0,
            top: 0.0,
            right: 0.0,
            bottom: 0.0,
        };
        assert_eq!(anchor_rect(zero, zero), None);

        let start = Rect {
            left: 10.0,
            top: 5.0,
            right: 11.0,
            bottom: 20.0,
        };
        let end = Rect {
            left: 40.0,
            top: 5.0,
            right: 41.0,
            bottom: 20.0,
        };
        let rect = anchor_rect(start, end).unwrap();
        assert_eq!(rect.width(), 31.0);
        assert_eq!(rect.height(), 15.0);
    }
}
