use kurbo::Rect;
use log::debug;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::focus::FocusState;
use crate::host::{DebugListener, FieldId, TextFieldHost};
use crate::interpreter::{GestureInterpreter, Interpretation};
use crate::models::RecognitionResult;
use crate::recognition::RecognitionEvent;

use super::SessionHandle;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// What happened to one event taken off the result channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DispatchReport {
    Applied {
        committed: bool,
        interpretation: Interpretation,
    },
    Error {
        message: String,
    },
    /// Produced before the latest clear, or after the session was destroyed.
    Dropped,
}

/// The delivery context: the only place text fields are mutated.
///
/// Drive it from the thread that owns the [`TextFieldHost`], either by
/// awaiting [`Dispatcher::dispatch_next`] or by polling
/// [`Dispatcher::try_dispatch`] from a UI loop.
pub struct Dispatcher {
    rx: mpsc::Receiver<RecognitionEvent>,
    session: SessionHandle,
    interpreter: GestureInterpreter,
    debug_listener: Option<Box<dyn DebugListener>>,
    debug: bool,
}

impl Dispatcher {
    pub(crate) fn new(
        rx: mpsc::Receiver<RecognitionEvent>,
        session: SessionHandle,
        interpreter: GestureInterpreter,
        debug: bool,
    ) -> Self {
        Self {
            rx,
            session,
            interpreter,
            debug_listener: None,
            debug,
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn focus(&self) -> &FocusState {
        self.interpreter.focus().state()
    }

    pub fn set_debug_listener(&mut self, listener: Option<Box<dyn DebugListener>>) {
        self.debug_listener = listener;
    }

    /// Send a report of every applied result to the debug listener.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn set_default_field<H>(&mut self, host: &mut H, field: FieldId) -> bool
    where
        H: TextFieldHost + ?Sized,
    {
        self.interpreter.focus_mut().set_default_field(host, field)
    }

    /// The host moved focus on its own; a new field starts a fresh session.
    pub fn on_focus_changed(&mut self, field: Option<FieldId>) {
        if self.interpreter.focus_mut().on_focus_changed(field) {
            self.session.clear_session();
        }
    }

    pub fn on_selection_changed(&mut self, field: FieldId, start: usize, end: usize) {
        self.interpreter
            .focus_mut()
            .on_selection_changed(field, start, end);
    }

    /// Wait for the next event and apply it. `None` once the session is gone.
    pub async fn dispatch_next<H>(&mut self, host: &mut H) -> Option<DispatchReport>
    where
        H: TextFieldHost + ?Sized,
    {
        let event = self.rx.recv().await?;
        Some(self.handle_event(host, event))
    }

    /// Apply the next event if one is ready.
    pub fn try_dispatch<H>(&mut self, host: &mut H) -> Option<DispatchReport>
    where
        H: TextFieldHost + ?Sized,
    {
        let event = self.rx.try_recv().ok()?;
        Some(self.handle_event(host, event))
    }

    fn handle_event<H>(&mut self, host: &mut H, event: RecognitionEvent) -> DispatchReport
    where
        H: TextFieldHost + ?Sized,
    {
        if self.session.is_destroyed() {
            return DispatchReport::Dropped;
        }

        match event {
            RecognitionEvent::Error { message } => {
                log_warn!("recognition error: {message}");
                if let Some(listener) = &self.debug_listener {
                    listener.on_error(&message);
                }
                DispatchReport::Error { message }
            }
            RecognitionEvent::Result { epoch, .. } if epoch != self.session.epoch() => {
                log_debug!("dropping result from cleared epoch {epoch}");
                DispatchReport::Dropped
            }
            RecognitionEvent::Result {
                result,
                committed,
                debug,
                ..
            } => {
                let interpretation = self.interpreter.interpret(host, &result, committed);
                if interpretation.cancel_recognition {
                    self.session.cancel_recognition();
                }
                self.interpreter.apply(host, &interpretation);
                self.report(&result, committed, &interpretation, &debug);

                DispatchReport::Applied {
                    committed,
                    interpretation,
                }
            }
        }
    }

    fn report(
        &self,
        result: &RecognitionResult,
        committed: bool,
        interpretation: &Interpretation,
        raw: &str,
    ) {
        if !self.debug {
            return;
        }
        let message = debug_message(result, committed, interpretation.overlapped, raw);
        debug!("{message}");
        if let Some(listener) = &self.debug_listener {
            listener.on_debug(&message);
        }
    }
}

fn debug_message(result: &RecognitionResult, committed: bool, overlapped: bool, raw: &str) -> String {
    let state = if committed {
        "COMMITTED"
    } else if result.is_recognizer_idle {
        "IDLE"
    } else {
        "BUSY"
    };

    let text = &result.text_result;
    let candidates = if text.candidates.is_empty() {
        String::new()
    } else {
        format!("  [{}]", text.candidates.join(", "))
    };

    format!(
        "Event State: {state}\nOverlapped: {}\nGesture Type: {}\nText result: {}{candidates}\nStroke rect: {}\n\n{raw}",
        if overlapped { "YES" } else { "NO" },
        result.gesture_type.as_str(),
        text.label,
        short_rect(result.stroke_rect),
    )
}

fn short_rect(rect: Rect) -> String {
    format!("[{},{}][{},{}]", rect.x0, rect.y0, rect.x1, rect.y1)
}
