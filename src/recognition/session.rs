use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use kurbo::{Point, Rect};
use log::debug;
use tokio::sync::Notify;

use crate::engine::{ExportFormat, Recognizer};
use crate::geometry::bounds_of;
use crate::models::{GestureType, PointerEvent, StrokePoint};

use super::jiix::WordSelector;

/// The text and gesture recognizer of one editing surface.
#[derive(Clone)]
pub(crate) struct Recognizers {
    pub(crate) text: Arc<dyn Recognizer>,
    pub(crate) gesture: Arc<dyn Recognizer>,
}

impl Recognizers {
    pub(crate) fn new(text: Box<dyn Recognizer>, gesture: Box<dyn Recognizer>) -> Self {
        Self {
            text: Arc::from(text),
            gesture: Arc::from(gesture),
        }
    }

    pub(crate) fn both_idle(&self) -> bool {
        self.text.is_idle() && self.gesture.is_idle()
    }

    /// Feed one sample. Engine errors are spurious event ordering from the
    /// capture layer; they are dropped.
    pub(crate) fn feed(&self, point: &StrokePoint, event: PointerEvent, to_gesture: bool) {
        let targets: &[(&str, &Arc<dyn Recognizer>)] = if to_gesture {
            &[("text", &self.text), ("gesture", &self.gesture)]
        } else {
            &[("text", &self.text)]
        };

        for (name, recognizer) in targets {
            let fed = match event {
                PointerEvent::Down => {
                    recognizer.pointer_down(point.x, point.y, point.timestamp_ms, point.pressure)
                }
                PointerEvent::Move => {
                    recognizer.pointer_move(point.x, point.y, point.timestamp_ms, point.pressure)
                }
                PointerEvent::Up => {
                    recognizer.pointer_up(point.x, point.y, point.timestamp_ms, point.pressure)
                }
            };
            if let Err(err) = fed {
                debug!("{name} recognizer rejected {event:?}: {err:#}");
            }
        }
    }

    /// Drop all strokes and block until both recognizers settle.
    pub(crate) fn clear_and_settle(&self) {
        for (name, recognizer) in [("text", &self.text), ("gesture", &self.gesture)] {
            if let Err(err) = recognizer.clear() {
                debug!("{name} recognizer failed to clear: {err:#}");
            }
        }
        self.text.wait_for_idle();
        self.gesture.wait_for_idle();
    }

    pub(crate) fn export(&self, gesture: bool) -> Option<String> {
        if gesture {
            self.gesture.result(ExportFormat::Jiix)
        } else {
            self.text.result(ExportFormat::Jiix)
        }
    }

    pub(crate) fn close(&self) {
        self.text.close();
        self.gesture.close();
    }
}

/// Raw path of the strokes fed since the last clear.
#[derive(Debug, Clone, Default)]
pub(crate) struct StrokePath {
    points: Vec<Point>,
}

impl StrokePath {
    pub(crate) fn move_to(&mut self, point: Point) {
        self.points.push(point);
    }

    pub(crate) fn line_to(&mut self, point: Point) {
        self.points.push(point);
    }

    pub(crate) fn reset(&mut self) {
        self.points.clear();
    }

    pub(crate) fn bounds(&self) -> Rect {
        bounds_of(&self.points)
    }

    pub(crate) fn points(&self) -> Vec<Point> {
        self.points.clone()
    }
}

pub(crate) struct ActiveSession {
    pub(crate) current_pointer: Option<i32>,
    pub(crate) stroke_count: u32,
    pub(crate) last_gesture: GestureType,
    pub(crate) last_event: Option<PointerEvent>,
    pub(crate) path: StrokePath,
    pub(crate) words: WordSelector,
    pub(crate) recognizers: Recognizers,
}

impl ActiveSession {
    pub(crate) fn new(recognizers: Recognizers) -> Self {
        Self {
            current_pointer: None,
            stroke_count: 0,
            last_gesture: GestureType::Empty,
            last_event: None,
            path: StrokePath::default(),
            words: WordSelector::new(),
            recognizers,
        }
    }

    /// Only the first stroke is a gesture candidate, except the second tap
    /// of a double tap.
    pub(crate) fn feeds_gesture(&self) -> bool {
        self.stroke_count < 2 || self.last_gesture == GestureType::Tap
    }

    pub(crate) fn reset_strokes(&mut self) {
        self.path.reset();
        self.stroke_count = 0;
        self.last_gesture = GestureType::Empty;
        self.current_pointer = None;
        self.last_event = None;
    }
}

/// State shared by the router (input thread), the poller task and the
/// delivery context.
///
/// `input_seq` counts accepted samples; a result is pending while the poller
/// has not settled on the latest one. `epoch` increases with every clear
/// request so results produced before it can be told apart.
pub(crate) struct SessionShared {
    session: Mutex<ActiveSession>,
    commit_requested: AtomicBool,
    clear_requested: AtomicBool,
    destroyed: AtomicBool,
    resetting: AtomicBool,
    input_seq: AtomicU64,
    settled_seq: AtomicU64,
    epoch: AtomicU64,
    pub(crate) wake: Notify,
}

impl SessionShared {
    pub(crate) fn new(recognizers: Recognizers) -> Self {
        Self {
            session: Mutex::new(ActiveSession::new(recognizers)),
            commit_requested: AtomicBool::new(false),
            clear_requested: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
            resetting: AtomicBool::new(false),
            input_seq: AtomicU64::new(0),
            settled_seq: AtomicU64::new(0),
            epoch: AtomicU64::new(0),
            wake: Notify::new(),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ActiveSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn recognizers(&self) -> Recognizers {
        self.lock().recognizers.clone()
    }

    /// Forget all strokes and empty both recognizers. Blocks on the engine,
    /// but not while holding the session lock; new strokes are refused until
    /// the recognizers have settled.
    pub(crate) fn reset_recognition(&self) {
        let recognizers = {
            let mut session = self.lock();
            session.reset_strokes();
            self.resetting.store(true, Ordering::SeqCst);
            session.recognizers.clone()
        };
        recognizers.clear_and_settle();
        self.resetting.store(false, Ordering::SeqCst);
        self.settle(self.input_seq());
    }

    pub(crate) fn is_resetting(&self) -> bool {
        self.resetting.load(Ordering::SeqCst)
    }

    /// Swap in new recognizers with an empty session. Outstanding commit and
    /// clear requests are void; results from the old recognizers turn stale.
    /// Only valid while no poller runs.
    pub(crate) fn replace_recognizers(&self, recognizers: Recognizers) -> Recognizers {
        let old = {
            let mut session = self.lock();
            session.reset_strokes();
            std::mem::replace(&mut session.recognizers, recognizers)
        };
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.finish_commit();
        self.finish_clear();
        self.settle(self.input_seq());
        old
    }

    pub(crate) fn mark_input(&self) {
        self.input_seq.fetch_add(1, Ordering::SeqCst);
        self.wake.notify_one();
    }

    pub(crate) fn input_seq(&self) -> u64 {
        self.input_seq.load(Ordering::SeqCst)
    }

    pub(crate) fn result_pending(&self) -> bool {
        self.input_seq.load(Ordering::SeqCst) > self.settled_seq.load(Ordering::SeqCst)
    }

    /// Results are up to date with input up to `seq`.
    pub(crate) fn settle(&self, seq: u64) {
        self.settled_seq.fetch_max(seq, Ordering::SeqCst);
    }

    pub(crate) fn request_commit(&self) {
        self.commit_requested.store(true, Ordering::SeqCst);
        self.settle(self.input_seq());
        self.wake.notify_one();
    }

    pub(crate) fn commit_requested(&self) -> bool {
        self.commit_requested.load(Ordering::SeqCst)
    }

    pub(crate) fn finish_commit(&self) {
        self.commit_requested.store(false, Ordering::SeqCst);
    }

    pub(crate) fn request_clear(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.clear_requested.store(true, Ordering::SeqCst);
        self.settle(self.input_seq());
        self.wake.notify_one();
    }

    pub(crate) fn clear_requested(&self) -> bool {
        self.clear_requested.load(Ordering::SeqCst)
    }

    pub(crate) fn finish_clear(&self) {
        self.clear_requested.store(false, Ordering::SeqCst);
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    pub(crate) fn has_work(&self) -> bool {
        self.commit_requested() || self.clear_requested() || self.result_pending()
    }

    pub(crate) fn mark_destroyed(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }
}
