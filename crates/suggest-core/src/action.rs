//! Remote check payloads and their decoded, position-resolved form.
//!
//! The remote checker answers each sentence with a [`CheckResponse`] holding a list of action
//! objects. Actions are decoded one at a time into [`RawAction`]; a malformed action is skipped
//! without affecting its siblings. The action tag is decoded once into [`ActionKind`], so the
//! rest of the pipeline never inspects tag strings again.
//!
//! Token offsets in an action are relative to the sentence text that was sent. Adding an anchor
//! offset (the absolute document position of that sentence) yields an [`ErrorRange`].

use crate::ignored::IgnoredErrors;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Tag prefix shared by the append family of actions (`$APPEND_,`, `$APPEND_the`, ...).
pub const APPEND_PREFIX: &str = "$APPEND_";
/// Tag of the delete action.
pub const DELETE_TAG: &str = "$DELETE";

/// Raw response of the remote checker for one sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Sentence as seen by the checker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    /// Fully corrected sentence, if the checker provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected: Option<String>,
    /// Action objects, kept verbatim.
    pub actions: Vec<Value>,
}

impl CheckResponse {
    /// Create a response carrying only `actions`.
    pub fn new(actions: Vec<Value>) -> Self {
        Self {
            original: None,
            corrected: None,
            actions,
        }
    }

    /// Decode every well-formed action, skipping the rest.
    pub fn decoded_actions(&self) -> impl Iterator<Item = RawAction> + '_ {
        self.actions.iter().filter_map(|value| {
            match serde_json::from_value::<RawAction>(value.clone()) {
                Ok(action) => Some(action),
                Err(err) => {
                    tracing::trace!("skipping malformed action {value}: {err}");
                    None
                }
            }
        })
    }
}

/// One action object as returned by the remote checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAction {
    /// Action tag: `$DELETE`, `$APPEND_*`, or anything else for a replacement.
    pub action: String,
    /// Start offset (chars) relative to the checked sentence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_start: Option<usize>,
    /// End offset (chars, exclusive) relative to the checked sentence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_end: Option<usize>,
    /// Text the action applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    /// Text to insert or substitute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_replacement: Option<String>,
    /// Checker confidence in `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Start word index, used by the word-level renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    /// End word index (exclusive), used by the word-level renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
    /// Any other fields, preserved for round-tripping into highlight payloads.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawAction {
    /// Decode the action tag.
    pub fn kind(&self) -> ActionKind {
        ActionKind::decode(&self.action, self.real_replacement.as_deref())
    }
}

/// The edit an action asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Insert text after the matched span.
    Append(String),
    /// Remove the matched span.
    Delete,
    /// Substitute the matched span.
    Replace(String),
}

impl ActionKind {
    /// Decode an action tag and its optional replacement text.
    ///
    /// A missing replacement decodes to an empty string; applying such an action fails later
    /// as an empty-text edit instead of silently deleting text.
    pub fn decode(tag: &str, replacement: Option<&str>) -> Self {
        let replacement = || replacement.unwrap_or_default().to_string();
        if tag.starts_with(APPEND_PREFIX) {
            Self::Append(replacement())
        } else if tag == DELETE_TAG {
            Self::Delete
        } else {
            Self::Replace(replacement())
        }
    }

    /// Returns `true` for the append family.
    pub fn is_append(&self) -> bool {
        matches!(self, Self::Append(_))
    }
}

/// Identity of one logical suggestion: `"{start}-{end}-{original}"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ErrorKey(String);

impl ErrorKey {
    /// Build the key from absolute positions and the original text.
    pub fn new(absolute_start: usize, absolute_end: usize, original: &str) -> Self {
        Self(format!("{absolute_start}-{absolute_end}-{original}"))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An action resolved to absolute document positions.
///
/// Serializes to the raw action object enriched with `absolute_token_start` and
/// `absolute_token_end`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionAction {
    /// The action as received.
    #[serde(flatten)]
    pub raw: RawAction,
    /// Decoded action tag.
    #[serde(skip)]
    pub kind: ActionKind,
    /// Absolute start position in the document.
    pub absolute_token_start: usize,
    /// Absolute end position in the document (exclusive).
    pub absolute_token_end: usize,
}

impl SuggestionAction {
    /// Resolve `raw` against `anchor`.
    ///
    /// Returns `None` if the action has no token span or its offsets overflow past the anchor.
    pub fn resolve(raw: RawAction, anchor: usize) -> Option<Self> {
        let (start, end) = (raw.token_start?, raw.token_end?);
        Some(Self {
            kind: raw.kind(),
            absolute_token_start: anchor.checked_add(start)?,
            absolute_token_end: anchor.checked_add(end)?,
            raw,
        })
    }

    /// Text the action applies to (empty if the checker did not send one).
    pub fn original(&self) -> &str {
        self.raw.original.as_deref().unwrap_or_default()
    }

    /// Identity key used for ignore tracking.
    pub fn key(&self) -> ErrorKey {
        ErrorKey::new(
            self.absolute_token_start,
            self.absolute_token_end,
            self.original(),
        )
    }

    /// The enriched action as JSON text.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A suggestion anchored to absolute document positions (`from..to`).
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRange {
    /// Start position (inclusive).
    pub from: usize,
    /// End position (exclusive).
    pub to: usize,
    /// The suggestion itself.
    pub action: SuggestionAction,
}

impl ErrorRange {
    /// Build a range spanning the action's absolute positions.
    pub fn from_action(action: SuggestionAction) -> Self {
        Self {
            from: action.absolute_token_start,
            to: action.absolute_token_end,
            action,
        }
    }

    /// Identity key of the underlying suggestion.
    pub fn key(&self) -> ErrorKey {
        self.action.key()
    }
}

/// Convert a checker response into absolute error ranges.
///
/// Actions without both token offsets are skipped. Actions whose identity key is in `ignored`
/// are dropped.
pub fn error_ranges(
    response: &CheckResponse,
    anchor: usize,
    ignored: &IgnoredErrors,
) -> Vec<ErrorRange> {
    let mut ranges = Vec::new();
    for raw in response.decoded_actions() {
        let Some(action) = SuggestionAction::resolve(raw, anchor) else {
            continue;
        };
        let key = action.key();
        if ignored.is_ignored(&key) {
            tracing::debug!(%key, "skipping ignored suggestion");
            continue;
        }
        ranges.push(ErrorRange::from_action(action));
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> CheckResponse {
        CheckResponse::new(vec![
            json!({"action": "$REPLACE_cat", "token_start": 0, "token_end": 3, "original": "cta", "real_replacement": "cat", "confidence": 0.9}),
            json!({"action": "$DELETE", "token_start": 4, "original": "the"}),
            json!({"action": "$APPEND_,", "token_start": 4, "token_end": 7, "original": "sat", "real_replacement": ","}),
            json!({"token_start": 1, "token_end": 2}),
        ])
    }

    #[test]
    fn test_decode_action_kinds() {
        assert_eq!(
            ActionKind::decode("$APPEND_the", Some(" the")),
            ActionKind::Append(" the".to_string())
        );
        assert_eq!(ActionKind::decode("$DELETE", None), ActionKind::Delete);
        assert_eq!(
            ActionKind::decode("$REPLACE_x", Some("x")),
            ActionKind::Replace("x".to_string())
        );
        assert_eq!(
            ActionKind::decode("$TRANSFORM_CASE_CAPITAL", None),
            ActionKind::Replace(String::new())
        );
    }

    #[test]
    fn test_error_ranges_are_anchored_and_partial_actions_skipped() {
        let ranges = error_ranges(&response(), 10, &IgnoredErrors::new());
        assert_eq!(ranges.len(), 2);
        assert_eq!((ranges[0].from, ranges[0].to), (10, 13));
        assert_eq!(ranges[0].action.kind, ActionKind::Replace("cat".to_string()));
        assert_eq!((ranges[1].from, ranges[1].to), (14, 17));
        assert!(ranges[1].action.kind.is_append());
    }

    #[test]
    fn test_overflowing_offsets_skip_only_that_action() {
        let response = CheckResponse::new(vec![
            json!({"action": "$DELETE", "token_start": u64::MAX, "token_end": u64::MAX, "original": "x"}),
            json!({"action": "$DELETE", "token_start": 0, "token_end": 2, "original": "ok"}),
        ]);
        let ranges = error_ranges(&response, 5, &IgnoredErrors::new());
        assert_eq!(ranges.len(), 1);
        assert_eq!((ranges[0].from, ranges[0].to), (5, 7));
        assert_eq!(ranges[0].action.original(), "ok");
    }

    #[test]
    fn test_ignored_keys_are_dropped() {
        let ignored = IgnoredErrors::new();
        ignored.ignore(ErrorKey::new(10, 13, "cta"));
        let ranges = error_ranges(&response(), 10, &ignored);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].action.original(), "sat");
    }

    #[test]
    fn test_identity_key_is_deterministic() {
        let a = ErrorKey::new(3, 7, "teh");
        let b = ErrorKey::new(3, 7, "teh");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "3-7-teh");
        assert_ne!(a, ErrorKey::new(4, 8, "teh"));
    }

    #[test]
    fn test_enriched_json_keeps_unknown_fields() {
        let response = CheckResponse::new(vec![json!({
            "action": "$DELETE", "token_start": 2, "token_end": 5, "original": "abc", "tag_id": 7
        })]);
        let ranges = error_ranges(&response, 100, &IgnoredErrors::new());
        let value: Value = serde_json::from_str(&ranges[0].action.to_json()).unwrap();
        assert_eq!(value["absolute_token_start"], json!(102));
        assert_eq!(value["absolute_token_end"], json!(105));
        assert_eq!(value["tag_id"], json!(7));
        assert_eq!(value["action"], json!("$DELETE"));
    }
}
