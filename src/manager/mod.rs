//! Public entry point: input on one side, text edits on the other.

mod controller;
mod dispatch;

use std::sync::Arc;

use crate::commit::{CommitScheduler, CommitState};
use crate::host::InkSurface;
use crate::recognition::SessionShared;

pub use controller::WriteToTypeManager;
pub use dispatch::{DispatchReport, Dispatcher};

/// Cheap handle on a session's recognition state, shared by the manager
/// and its dispatcher.
#[derive(Clone)]
pub struct SessionHandle {
    shared: Arc<SessionShared>,
    scheduler: CommitScheduler,
    ink: Arc<dyn InkSurface>,
}

impl SessionHandle {
    pub(crate) fn new(
        shared: Arc<SessionShared>,
        scheduler: CommitScheduler,
        ink: Arc<dyn InkSurface>,
    ) -> Self {
        Self {
            shared,
            scheduler,
            ink,
        }
    }

    /// Throw away the strokes being recognized: clear the recognizers, wipe
    /// the ink without animation and disarm the commit timer.
    pub fn cancel_recognition(&self) {
        self.shared.request_clear();
        self.ink.clear_strokes(false);
        self.scheduler.cancel();
    }

    /// Forget the reference word height used to tell dots from commas.
    pub fn clear_session(&self) {
        self.shared.lock().words.reset();
    }

    pub fn commit_state(&self) -> CommitState {
        self.scheduler.state()
    }

    pub fn is_destroyed(&self) -> bool {
        self.shared.is_destroyed()
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.shared.epoch()
    }
}
