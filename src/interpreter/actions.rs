use kurbo::{Point, Rect};
use serde::Serialize;

use crate::focus::{rect_range, FocusResolver};
use crate::host::{editor, FieldId, Highlight, TextFieldHost};

/// One mutation of the focused field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum EditAction {
    /// Type recognized text at the caret.
    InsertText { text: String },
    InsertSpace { at: Point },
    EraseSpace { at: Point },
    Select { rect: Rect, highlight: Highlight },
    EraseRange { rect: Rect },
    PlaceCursor { at: Point },
    SelectWord { at: Point },
    ForwardCursor,
    BackwardDelete,
}

impl EditAction {
    pub fn name(&self) -> &'static str {
        match self {
            EditAction::InsertText { .. } => "insert-text",
            EditAction::InsertSpace { .. } => "insert-space",
            EditAction::EraseSpace { .. } => "erase-space",
            EditAction::Select { .. } => "select",
            EditAction::EraseRange { .. } => "erase-range",
            EditAction::PlaceCursor { .. } => "place-cursor",
            EditAction::SelectWord { .. } => "select-word",
            EditAction::ForwardCursor => "forward-cursor",
            EditAction::BackwardDelete => "backward-delete",
        }
    }
}

pub(crate) fn apply_edit<H>(host: &mut H, focus: &FocusResolver, field: FieldId, edit: &EditAction)
where
    H: TextFieldHost + ?Sized,
{
    match edit {
        EditAction::InsertText { text } => {
            editor::insert_text(host, field, text, focus.punctuations())
        }
        EditAction::InsertSpace { at } => {
            let position = focus.offset_at(host, field, *at);
            editor::insert_space(host, field, position);
        }
        EditAction::EraseSpace { at } => {
            let position = focus.offset_at(host, field, *at);
            editor::erase_space(host, field, position);
        }
        EditAction::Select { rect, highlight } => focus.select_rect(host, field, *rect, *highlight),
        EditAction::EraseRange { rect } => {
            let (start, end) = rect_range(host, field, *rect);
            editor::erase_range(host, field, start, end);
        }
        EditAction::PlaceCursor { at } => focus.select_at(host, field, *at, false),
        EditAction::SelectWord { at } => focus.select_at(host, field, *at, true),
        EditAction::ForwardCursor => editor::forward_cursor(host, field),
        EditAction::BackwardDelete => editor::backward_delete(host, field),
    }
}
