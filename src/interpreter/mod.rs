//! Maps recognition results onto text edits.
//!
//! [`GestureInterpreter::interpret`] looks at one [`RecognitionResult`] and
//! decides on at most one [`EditAction`] for the focused field. Focus moves
//! happen while interpreting; the edit itself is carried out by
//! [`GestureInterpreter::apply`].

mod actions;
mod gestures;
mod heuristics;

use kurbo::{Point, Rect};
use serde::Serialize;

use crate::focus::FocusResolver;
use crate::host::{FieldId, TextFieldHost};
use crate::models::{GestureType, RecognitionResult};

pub use actions::EditAction;

/// Outcome of interpreting one result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretation {
    pub gesture: GestureType,
    /// Field the edit targets.
    pub field: Option<FieldId>,
    /// The stroke acted on existing text.
    pub overlapped: bool,
    pub edit: Option<EditAction>,
    /// Drop the current recognition: clear the recognizers, wipe the ink
    /// without animation and disarm the commit timer.
    pub cancel_recognition: bool,
    /// Pulse the haptic actuator once.
    pub haptic: bool,
    /// Reference point used for the decision, if any.
    pub touch: Option<Point>,
    /// Text line box the stroke was compared against.
    pub text_bounds: Option<Rect>,
}

impl Interpretation {
    fn new(gesture: GestureType) -> Self {
        Self {
            gesture,
            field: None,
            overlapped: false,
            edit: None,
            cancel_recognition: false,
            haptic: false,
            touch: None,
            text_bounds: None,
        }
    }
}

pub struct GestureInterpreter {
    focus: FocusResolver,
    long_press_active: bool,
}

impl GestureInterpreter {
    pub fn new(focus: FocusResolver) -> Self {
        Self {
            focus,
            long_press_active: false,
        }
    }

    pub fn focus(&self) -> &FocusResolver {
        &self.focus
    }

    pub fn focus_mut(&mut self) -> &mut FocusResolver {
        &mut self.focus
    }

    /// Decide what `result` does to the text.
    pub fn interpret<H>(
        &mut self,
        host: &mut H,
        result: &RecognitionResult,
        committed: bool,
    ) -> Interpretation
    where
        H: TextFieldHost + ?Sized,
    {
        let mut out = Interpretation::new(result.gesture_type);
        match result.gesture_type {
            GestureType::None | GestureType::Empty => {
                if result.is_pointer_up {
                    self.on_scratch(host, result, committed, &mut out);
                }
            }
            GestureType::TopBottom => self.on_top_bottom(host, result, committed, &mut out),
            GestureType::BottomTop => self.on_bottom_top(host, result, &mut out),
            GestureType::LeftRight => self.on_left_right(host, result, &mut out),
            GestureType::RightLeft => self.on_right_left(host, result, &mut out),
            GestureType::Scratch => self.on_scratch(host, result, committed, &mut out),
            GestureType::Surround => self.on_surround(host, result, committed, &mut out),
            GestureType::Tap => self.on_tap(host, result, committed, &mut out),
            GestureType::DoubleTap => self.on_double_tap(host, result, &mut out),
            GestureType::LongPress => self.on_long_press(host, result, &mut out),
        }
        out
    }

    /// Carry out the edit of `interpretation`.
    pub fn apply<H>(&mut self, host: &mut H, interpretation: &Interpretation)
    where
        H: TextFieldHost + ?Sized,
    {
        if let (Some(field), Some(edit)) = (interpretation.field, &interpretation.edit) {
            actions::apply_edit(host, &self.focus, field, edit);
        }
        if interpretation.haptic {
            host.haptic_feedback();
        }
        self.focus.sync_selection(host);
    }
}
