//! Per-gesture rules.

use kurbo::{Point, Rect};

use crate::focus::{text_bounds, LineKind};
use crate::geometry::intersection;
use crate::host::{Highlight, TextFieldHost};
use crate::models::RecognitionResult;

use super::heuristics::{in_distance, line_anchor, overlaps_enough, passes_through};
use super::{EditAction, GestureInterpreter, Interpretation};

/// The stroke measured against the focused field's text.
struct Target {
    center: Point,
    bounds: Option<Rect>,
    intersect: Option<Rect>,
}

impl Target {
    /// Stroke centre inside a text line it also overlaps.
    fn centred_on_text(&self) -> bool {
        self.intersect.is_some() && self.bounds.is_some_and(|b| b.contains(self.center))
    }
}

impl GestureInterpreter {
    fn target<H>(&self, host: &H, stroke: Rect, out: &mut Interpretation) -> Option<Target>
    where
        H: TextFieldHost + ?Sized,
    {
        let field = self.focus.focused()?;
        let center = stroke.center();
        let bounds = text_bounds(host, field, center);
        out.field = Some(field);
        out.text_bounds = bounds;
        Some(Target {
            center,
            bounds,
            intersect: bounds.and_then(|b| intersection(stroke, b)),
        })
    }

    fn overlapping(target: &Target, stroke: Rect) -> Option<Rect> {
        target
            .intersect
            .filter(|intersect| overlaps_enough(stroke, *intersect))
    }

    /// Type the recognized text, once the recognition is committed.
    fn insert_recognized(&self, result: &RecognitionResult, committed: bool, out: &mut Interpretation) {
        let Some(field) = self.focus.focused() else {
            return;
        };
        out.field = Some(field);
        if !committed {
            return;
        }
        if let Some(text) = result.text_result.insertable_text() {
            out.edit = Some(EditAction::InsertText {
                text: text.to_string(),
            });
        }
    }

    /// Vertical line down through text splits it with a space.
    pub(super) fn on_top_bottom<H>(
        &mut self,
        host: &mut H,
        result: &RecognitionResult,
        committed: bool,
        out: &mut Interpretation,
    ) where
        H: TextFieldHost + ?Sized,
    {
        if !result.is_pointer_up {
            return;
        }

        let stroke = result.stroke_rect;
        self.focus
            .check_focus_changed_with_extra_distance(host, stroke, LineKind::Vertical);
        let Some(target) = self.target(host, stroke, out) else {
            return;
        };

        let has_text = out.field.is_some_and(|field| !host.text(field).is_empty());
        let extra = self.focus.extra_distance();
        let split_at = target.bounds.filter(|bounds| {
            has_text
                && ((target.intersect.is_some() && passes_through(stroke, *bounds))
                    || (in_distance(stroke, *bounds, LineKind::Vertical, extra) && committed))
        });

        match split_at {
            Some(bounds) => {
                out.cancel_recognition = true;
                out.edit = Some(EditAction::InsertSpace {
                    at: line_anchor(&result.stroke_points, stroke, bounds),
                });
                out.overlapped = true;
            }
            None => self.insert_recognized(result, committed, out),
        }
    }

    /// Vertical line up through a gap joins the words around it.
    pub(super) fn on_bottom_top<H>(
        &mut self,
        host: &mut H,
        result: &RecognitionResult,
        out: &mut Interpretation,
    ) where
        H: TextFieldHost + ?Sized,
    {
        if !result.is_pointer_up {
            return;
        }

        let stroke = result.stroke_rect;
        self.focus
            .check_focus_changed_with_extra_distance(host, stroke, LineKind::Vertical);
        let Some(target) = self.target(host, stroke, out) else {
            return;
        };

        let extra = self.focus.extra_distance();
        let join_at = target.bounds.filter(|bounds| {
            (target.intersect.is_some() && passes_through(stroke, *bounds))
                || in_distance(stroke, *bounds, LineKind::Vertical, extra)
        });

        if let Some(bounds) = join_at {
            out.cancel_recognition = true;
            out.edit = Some(EditAction::EraseSpace {
                at: line_anchor(&result.stroke_points, stroke, bounds),
            });
            out.overlapped = true;
        }
    }

    /// Underline or strike-through selects; elsewhere steps the caret right.
    pub(super) fn on_left_right<H>(
        &mut self,
        host: &mut H,
        result: &RecognitionResult,
        out: &mut Interpretation,
    ) where
        H: TextFieldHost + ?Sized,
    {
        let stroke = result.stroke_rect;
        self.focus
            .check_focus_changed_with_extra_distance(host, stroke, LineKind::Horizontal);
        let Some(target) = self.target(host, stroke, out) else {
            return;
        };

        let extra = self.focus.extra_distance();
        let hit = target.bounds.is_some_and(|bounds| {
            Self::overlapping(&target, stroke).is_some()
                || in_distance(stroke, bounds, LineKind::Horizontal, extra)
        });

        if hit {
            out.cancel_recognition = result.is_pointer_up;
            out.edit = Some(EditAction::Select {
                rect: target.intersect.unwrap_or(stroke),
                highlight: Highlight::Default,
            });
            out.overlapped = true;
        } else if result.is_recognizer_idle {
            out.cancel_recognition = true;
            out.edit = Some(EditAction::ForwardCursor);
        }
    }

    /// Strike-through selects; elsewhere deletes backward.
    pub(super) fn on_right_left<H>(
        &mut self,
        host: &mut H,
        result: &RecognitionResult,
        out: &mut Interpretation,
    ) where
        H: TextFieldHost + ?Sized,
    {
        let stroke = result.stroke_rect;
        self.focus.check_focus_changed(host, stroke);
        let Some(target) = self.target(host, stroke, out) else {
            return;
        };

        if let Some(intersect) = Self::overlapping(&target, stroke) {
            out.cancel_recognition = result.is_pointer_up;
            out.edit = Some(EditAction::Select {
                rect: intersect,
                highlight: Highlight::Default,
            });
            out.overlapped = true;
        } else if result.is_recognizer_idle {
            out.cancel_recognition = true;
            out.edit = Some(EditAction::BackwardDelete);
        }
    }

    /// Scribbling over text previews then erases it; anything else is
    /// handwriting.
    pub(super) fn on_scratch<H>(
        &mut self,
        host: &mut H,
        result: &RecognitionResult,
        committed: bool,
        out: &mut Interpretation,
    ) where
        H: TextFieldHost + ?Sized,
    {
        let stroke = result.stroke_rect;
        self.focus.check_focus_changed(host, stroke);
        let Some(target) = self.target(host, stroke, out) else {
            return;
        };

        match Self::overlapping(&target, stroke) {
            Some(intersect) if result.is_pointer_up => {
                out.cancel_recognition = true;
                out.edit = Some(EditAction::EraseRange { rect: intersect });
                out.overlapped = true;
            }
            Some(_) => {
                out.edit = Some(EditAction::Select {
                    rect: stroke,
                    highlight: Highlight::Scratch,
                });
                out.overlapped = true;
            }
            None => self.insert_recognized(result, committed, out),
        }
    }

    /// Circling text selects it.
    pub(super) fn on_surround<H>(
        &mut self,
        host: &mut H,
        result: &RecognitionResult,
        committed: bool,
        out: &mut Interpretation,
    ) where
        H: TextFieldHost + ?Sized,
    {
        let stroke = result.stroke_rect;
        self.focus.check_focus_changed(host, stroke);
        let Some(target) = self.target(host, stroke, out) else {
            return;
        };

        if target.centred_on_text() {
            out.cancel_recognition = result.is_pointer_up;
            out.edit = Some(EditAction::Select {
                rect: stroke,
                highlight: Highlight::Default,
            });
            out.overlapped = true;
        } else {
            self.insert_recognized(result, committed, out);
        }
    }

    /// Tap another field to focus it, tap text to move the caret.
    pub(super) fn on_tap<H>(
        &mut self,
        host: &mut H,
        result: &RecognitionResult,
        committed: bool,
        out: &mut Interpretation,
    ) where
        H: TextFieldHost + ?Sized,
    {
        if !result.is_recognizer_idle {
            return;
        }

        let center = result.stroke_rect.center();
        let Some(field) = host.field_at(center) else {
            self.insert_recognized(result, committed, out);
            return;
        };

        let bounds = text_bounds(host, field, center);
        out.field = Some(field);
        out.text_bounds = bounds;

        if Some(field) != self.focus.focused() {
            out.cancel_recognition = true;
            self.focus.switch_to(host, field, center);
            out.overlapped = true;
            out.touch = Some(center);
        } else if bounds.is_some_and(|b| b.contains(center)) {
            let cursor = self.focus.offset_at(host, field, center);
            let moved = match self.focus.state().selection {
                Some((start, end)) => start != end || start != cursor,
                None => true,
            };
            if moved {
                out.cancel_recognition = true;
                out.edit = Some(EditAction::PlaceCursor { at: center });
            }
            out.overlapped = true;
            out.touch = Some(center);
        } else {
            self.insert_recognized(result, committed, out);
        }
    }

    /// Double tap on a word selects it. Always ends the recognition.
    pub(super) fn on_double_tap<H>(
        &mut self,
        host: &mut H,
        result: &RecognitionResult,
        out: &mut Interpretation,
    ) where
        H: TextFieldHost + ?Sized,
    {
        let stroke = result.stroke_rect;
        self.focus.check_focus_changed(host, stroke);
        if let Some(target) = self.target(host, stroke, out) {
            out.touch = Some(target.center);
            if target.centred_on_text() {
                out.edit = Some(EditAction::SelectWord { at: target.center });
                out.overlapped = true;
            }
        }
        out.cancel_recognition = true;
    }

    /// Press and hold on a word selects it with a single haptic pulse.
    pub(super) fn on_long_press<H>(
        &mut self,
        host: &mut H,
        result: &RecognitionResult,
        out: &mut Interpretation,
    ) where
        H: TextFieldHost + ?Sized,
    {
        let stroke = result.stroke_rect;
        self.focus.check_focus_changed(host, stroke);
        let Some(target) = self.target(host, stroke, out) else {
            return;
        };
        out.touch = Some(target.center);

        if result.is_pointer_up {
            out.cancel_recognition = true;
            self.long_press_active = false;
            out.overlapped = target.centred_on_text();
        } else if target.centred_on_text() {
            if !self.long_press_active {
                self.long_press_active = true;
                out.haptic = true;
            }
            out.edit = Some(EditAction::SelectWord { at: target.center });
            out.overlapped = true;
        }
    }
}
