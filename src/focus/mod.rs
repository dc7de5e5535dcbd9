//! Which field a stroke targets, and where in its text.

mod bounds;
mod selection;

use kurbo::{Point, Rect};
use serde::Serialize;

use crate::geometry::EngineScale;
use crate::host::{FieldId, Highlight, TextFieldHost};

pub(crate) use bounds::text_bounds;
pub(crate) use selection::rect_range;

/// Strokes this many times taller than the focused field never move focus.
const BIGGER_HEIGHT_FACTOR: f64 = 3.0;
/// Reach of line gestures beyond the text, in millimetres.
const UNDERLINE_DISTANCE_MM: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusState {
    pub field: Option<FieldId>,
    /// Last selection reported for `field`, `(start, end)`.
    pub selection: Option<(usize, usize)>,
}

/// Tracks the focused field and resolves stroke geometry into text
/// positions within it.
#[derive(Debug, Clone)]
pub struct FocusResolver {
    state: FocusState,
    extra_distance: f64,
    punctuations: String,
}

impl FocusResolver {
    pub fn new(scale: EngineScale, punctuations: impl Into<String>) -> Self {
        Self {
            state: FocusState::default(),
            extra_distance: scale.vertical_mm_to_surface(UNDERLINE_DISTANCE_MM),
            punctuations: punctuations.into(),
        }
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn focused(&self) -> Option<FieldId> {
        self.state.field
    }

    /// The 5 mm band around text, in surface pixels.
    pub fn extra_distance(&self) -> f64 {
        self.extra_distance
    }

    pub fn punctuations(&self) -> &str {
        &self.punctuations
    }

    /// Focus `field` before any stroke arrives.
    pub fn set_default_field<H>(&mut self, host: &mut H, field: FieldId) -> bool
    where
        H: TextFieldHost + ?Sized,
    {
        if host.field_frame(field).is_none() {
            return false;
        }
        host.request_focus(field);
        self.state.field = Some(field);
        self.state.selection = Some(host.selection(field));
        true
    }

    /// Focus moved outside of gesture handling. Returns true when the focused
    /// field actually changed.
    pub fn on_focus_changed(&mut self, field: Option<FieldId>) -> bool {
        if field == self.state.field {
            return false;
        }
        self.state.field = field;
        self.state.selection = None;
        true
    }

    pub fn on_selection_changed(&mut self, field: FieldId, start: usize, end: usize) {
        self.state.field = Some(field);
        self.state.selection = Some((start, end));
    }

    /// Re-read the focused field's selection from the host.
    pub(crate) fn sync_selection<H>(&mut self, host: &H)
    where
        H: TextFieldHost + ?Sized,
    {
        if let Some(field) = self.state.field {
            self.state.selection = Some(host.selection(field));
        }
    }

    fn too_tall<H>(&self, host: &H, stroke: Rect) -> bool
    where
        H: TextFieldHost + ?Sized,
    {
        self.state
            .field
            .and_then(|field| host.field_frame(field))
            .map(|frame| frame.height() * BIGGER_HEIGHT_FACTOR < stroke.height())
            .unwrap_or(false)
    }

    /// Follow a stroke into another field.
    pub(crate) fn check_focus_changed<H>(&mut self, host: &mut H, stroke: Rect)
    where
        H: TextFieldHost + ?Sized,
    {
        if self.too_tall(host, stroke) {
            return;
        }
        self.change_focus_to(host, None, stroke.center());
    }

    /// Like [`FocusResolver::check_focus_changed`], but a line drawn just
    /// outside any field may still claim the field it underlines (horizontal)
    /// or the multi-line field it splits (vertical).
    pub(crate) fn check_focus_changed_with_extra_distance<H>(
        &mut self,
        host: &mut H,
        stroke: Rect,
        kind: LineKind,
    ) where
        H: TextFieldHost + ?Sized,
    {
        if self.too_tall(host, stroke) {
            return;
        }

        let center = stroke.center();
        if let Some(field) = host.field_at(center) {
            self.change_focus_to(host, Some(field), center);
            return;
        }

        match kind {
            LineKind::Horizontal => {
                let probe = Point::new(center.x, stroke.y0 - self.extra_distance);
                self.change_focus_to(host, None, probe);
            }
            LineKind::Vertical => {
                let probe = Point::new(stroke.x0 - self.extra_distance, center.y);
                if let Some(field) = host.field_at(probe) {
                    if host.is_multiline(field) {
                        self.change_focus_to(host, Some(field), probe);
                    }
                }
            }
        }
    }

    /// Move focus to `field` (or the field under `at`) if it differs from the
    /// focused one, placing the caret at `at`.
    pub(crate) fn change_focus_to<H>(&mut self, host: &mut H, field: Option<FieldId>, at: Point)
    where
        H: TextFieldHost + ?Sized,
    {
        let Some(field) = field.or_else(|| host.field_at(at)) else {
            return;
        };
        if Some(field) != self.state.field {
            self.switch_to(host, field, at);
        }
    }

    /// Focus `field` and place the caret at `at`.
    pub(crate) fn switch_to<H>(&mut self, host: &mut H, field: FieldId, at: Point)
    where
        H: TextFieldHost + ?Sized,
    {
        host.request_focus(field);
        self.state.field = Some(field);
        selection::select_at(host, field, at, false, &self.punctuations);
        self.state.selection = Some(host.selection(field));
    }

    pub(crate) fn offset_at<H>(&self, host: &H, field: FieldId, at: Point) -> usize
    where
        H: TextFieldHost + ?Sized,
    {
        host.offset_for_position(field, at)
    }

    /// Caret at `at`, or the word there when `range` is set.
    pub(crate) fn select_at<H>(&self, host: &mut H, field: FieldId, at: Point, range: bool)
    where
        H: TextFieldHost + ?Sized,
    {
        selection::select_at(host, field, at, range, &self.punctuations);
    }

    pub(crate) fn select_rect<H>(&self, host: &mut H, field: FieldId, rect: Rect, highlight: Highlight)
    where
        H: TextFieldHost + ?Sized,
    {
        selection::select_rect(host, field, rect, highlight);
    }
}
