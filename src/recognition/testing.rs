//! Recognizer double for unit tests.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::engine::{ExportFormat, Recognizer};

#[derive(Default)]
pub(crate) struct RecordingRecognizer {
    fed: AtomicUsize,
    cleared: AtomicUsize,
    busy: AtomicBool,
    failing: AtomicBool,
    hold_idle: AtomicBool,
    waiting: AtomicBool,
    export: Mutex<Option<String>>,
}

impl RecordingRecognizer {
    pub(crate) fn with_export(export: &str) -> Self {
        let recognizer = Self::default();
        recognizer.set_export(Some(export));
        recognizer
    }

    pub(crate) fn set_export(&self, export: Option<&str>) {
        *self.export.lock().unwrap() = export.map(str::to_string);
    }

    pub(crate) fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
    }

    /// Reject every pointer sample after counting it.
    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Keep `wait_for_idle` blocked until released.
    pub(crate) fn hold_idle(&self, hold: bool) {
        self.hold_idle.store(hold, Ordering::SeqCst);
    }

    /// A caller is inside `wait_for_idle`.
    pub(crate) fn waiting(&self) -> bool {
        self.waiting.load(Ordering::SeqCst)
    }

    pub(crate) fn fed(&self) -> usize {
        self.fed.load(Ordering::SeqCst)
    }

    pub(crate) fn cleared(&self) -> usize {
        self.cleared.load(Ordering::SeqCst)
    }

    fn record(&self) -> Result<()> {
        self.fed.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            bail!("sample rejected");
        }
        Ok(())
    }
}

impl Recognizer for RecordingRecognizer {
    fn pointer_down(&self, _x: f32, _y: f32, _t: i64, _p: f32) -> Result<()> {
        self.record()
    }

    fn pointer_move(&self, _x: f32, _y: f32, _t: i64, _p: f32) -> Result<()> {
        self.record()
    }

    fn pointer_up(&self, _x: f32, _y: f32, _t: i64, _p: f32) -> Result<()> {
        self.record()
    }

    fn is_idle(&self) -> bool {
        !self.busy.load(Ordering::SeqCst)
    }

    fn wait_for_idle(&self) {
        self.waiting.store(true, Ordering::SeqCst);
        while self.hold_idle.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(1));
        }
        self.waiting.store(false, Ordering::SeqCst);
    }

    fn clear(&self) -> Result<()> {
        self.cleared.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn result(&self, _format: ExportFormat) -> Option<String> {
        self.export.lock().unwrap().clone()
    }
}
