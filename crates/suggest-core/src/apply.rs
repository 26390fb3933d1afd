//! Turning an accepted suggestion into a document edit.

use crate::action::{ActionKind, SuggestionAction};
use crate::decorations::DecorationRange;
use crate::document::SuggestDocument;
use crate::edit::{DocumentEdit, EditDelta};

/// The edit that accepting `action` over `range` performs.
///
/// - append: insert the replacement at `range.to`, leaving the matched span in place
/// - delete: remove `range.from..range.to`
/// - replace: substitute `range.from..range.to` with the replacement
pub fn suggestion_edit(action: &SuggestionAction, range: DecorationRange) -> DocumentEdit {
    match &action.kind {
        ActionKind::Append(text) => DocumentEdit::Insert {
            at: range.to,
            text: text.clone(),
        },
        ActionKind::Delete => DocumentEdit::Delete {
            from: range.from,
            to: range.to,
        },
        ActionKind::Replace(text) => DocumentEdit::Replace {
            from: range.from,
            to: range.to,
            text: text.clone(),
        },
    }
}

/// Apply `action` to `doc` as one atomic edit.
///
/// Failures (stale positions, empty replacement text, ...) are logged and nothing is applied.
pub fn apply_suggestion<D>(
    doc: &mut D,
    action: &SuggestionAction,
    range: DecorationRange,
) -> Option<EditDelta>
where
    D: SuggestDocument + ?Sized,
{
    let edit = suggestion_edit(action, range);
    match doc.apply_edit(&edit) {
        Ok(delta) => {
            let (from, to) = edit.range();
            tracing::debug!(
                action = %action.raw.action,
                from,
                to,
                inserted = edit.inserted_text(),
                "applied suggestion"
            );
            Some(delta)
        }
        Err(err) => {
            tracing::warn!(action = %action.raw.action, "failed to apply suggestion: {err}");
            None
        }
    }
}
