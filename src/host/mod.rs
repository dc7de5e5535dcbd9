//! Collaborators owned by the embedding application.
//!
//! [`TextFieldHost`] is the text buffer adapter: a set of text fields laid
//! out on the writing surface, queried and mutated only from the delivery
//! context. Offsets are character (not byte) offsets.

pub mod editor;
mod monospace;

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

pub use monospace::MonospaceTextHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId(pub usize);

/// Selection highlight style requested by a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Highlight {
    #[default]
    Default,
    /// Light grey preview of a scratch-out in progress.
    Scratch,
}

pub trait TextFieldHost {
    /// Field whose frame contains `point`, first match wins.
    fn field_at(&self, point: Point) -> Option<FieldId>;

    fn field_frame(&self, field: FieldId) -> Option<Rect>;

    fn is_multiline(&self, field: FieldId) -> bool;

    fn text(&self, field: FieldId) -> String;

    fn line_count(&self, field: FieldId) -> usize;

    /// Full box of a layout line in surface coordinates, including the empty
    /// space after its last glyph.
    fn line_bounds(&self, field: FieldId, line: usize) -> Rect;

    /// Width of the rendered text of `line`, measured from the line's left
    /// edge.
    fn line_width(&self, field: FieldId, line: usize) -> f64;

    /// Nearest character offset to a surface point.
    fn offset_for_position(&self, field: FieldId, point: Point) -> usize;

    /// `(start, end)`; equal for a caret.
    fn selection(&self, field: FieldId) -> (usize, usize);

    fn set_selection(&mut self, field: FieldId, start: usize, end: usize);

    /// Replace `[start, end)` with `text`. A caret or selection edge at or
    /// after `end` moves with the edit.
    fn replace(&mut self, field: FieldId, start: usize, end: usize, text: &str);

    fn request_focus(&mut self, field: FieldId);

    fn set_highlight(&mut self, _field: FieldId, _highlight: Highlight) {}

    /// Short haptic pulse when a long press starts selecting.
    fn haptic_feedback(&mut self) {}
}

/// The layer drawing live ink above the fields.
pub trait InkSurface: Send + Sync {
    fn clear_strokes(&self, animate: bool);
}

/// Free-form diagnostics; no schema.
pub trait DebugListener: Send {
    fn on_debug(&self, message: &str);
    fn on_error(&self, message: &str);
}
