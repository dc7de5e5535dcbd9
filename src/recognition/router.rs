use std::sync::Arc;

use crate::models::{PointerEvent, StrokePoint};

use super::session::SessionShared;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = false;

use crate::log_debug;

/// Decides, per point, which recognizers see it.
///
/// Only one pointer is tracked at a time. The text recognizer receives every
/// accepted point; the gesture recognizer only the first stroke after a
/// clear, or any stroke following a tap.
#[derive(Clone)]
pub(crate) struct StrokeRouter {
    shared: Arc<SessionShared>,
}

impl StrokeRouter {
    pub(crate) fn new(shared: Arc<SessionShared>) -> Self {
        Self { shared }
    }

    /// Start a stroke. Refused while another pointer is down, a clear is
    /// pending or the recognizers are being emptied.
    pub(crate) fn route_down(&self, point: &StrokePoint, pointer_id: i32) -> bool {
        if self.shared.clear_requested() {
            log_debug!("down from pointer {pointer_id} refused: clear pending");
            return false;
        }

        {
            let mut session = self.shared.lock();
            if session.current_pointer.is_some() {
                log_debug!("down from pointer {pointer_id} refused: stroke in progress");
                return false;
            }
            if self.shared.is_resetting() {
                log_debug!("down from pointer {pointer_id} refused: recognizers resetting");
                return false;
            }

            session.stroke_count += 1;
            session.path.move_to(point.position());
            let to_gesture = session.feeds_gesture();
            session
                .recognizers
                .feed(point, PointerEvent::Down, to_gesture);
            session.last_event = Some(PointerEvent::Down);
            session.current_pointer = Some(pointer_id);
        }

        self.shared.mark_input();
        true
    }

    pub(crate) fn route_move(&self, point: &StrokePoint, pointer_id: i32) -> bool {
        self.route_continuation(point, pointer_id, PointerEvent::Move)
    }

    pub(crate) fn route_up(&self, point: &StrokePoint, pointer_id: i32) -> bool {
        self.route_continuation(point, pointer_id, PointerEvent::Up)
    }

    /// Release the active pointer without finishing its stroke.
    pub(crate) fn route_cancel(&self) -> Option<i32> {
        self.shared.lock().current_pointer.take()
    }

    fn route_continuation(&self, point: &StrokePoint, pointer_id: i32, event: PointerEvent) -> bool {
        {
            let mut session = self.shared.lock();
            if session.current_pointer != Some(pointer_id) {
                return false;
            }

            session.path.line_to(point.position());
            let to_gesture = session.feeds_gesture();
            session.recognizers.feed(point, event, to_gesture);
            session.last_event = Some(event);
            if event == PointerEvent::Up {
                session.current_pointer = None;
            }
        }

        self.shared.mark_input();
        true
    }
}
