//! Recognition engine seam.
//!
//! The engine itself is a black box: it consumes pointer samples in
//! millimetres and exports its current interpretation as JIIX on demand.
//! Implementations wrap a vendor SDK; tests use scripted fakes.

use anyhow::Result;

use crate::geometry::EngineScale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecognizerKind {
    Text,
    Gesture,
}

impl RecognizerKind {
    /// Value of the `type` field in this recognizer's JIIX export.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecognizerKind::Text => "Text",
            RecognizerKind::Gesture => "Gesture",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Jiix,
}

/// One live recognizer instance.
///
/// Methods take `&self`; the router feeds points from the input thread while
/// the poller reads results from its own task, so implementations must
/// synchronise internally.
pub trait Recognizer: Send + Sync {
    fn pointer_down(&self, x: f32, y: f32, t: i64, p: f32) -> Result<()>;
    fn pointer_move(&self, x: f32, y: f32, t: i64, p: f32) -> Result<()>;
    fn pointer_up(&self, x: f32, y: f32, t: i64, p: f32) -> Result<()>;

    /// All fed strokes have been processed.
    fn is_idle(&self) -> bool;

    /// Blocks until [`Recognizer::is_idle`] would return true.
    fn wait_for_idle(&self);

    /// Drop all fed strokes.
    fn clear(&self) -> Result<()>;

    /// Current recognition export; `None` when the engine produced nothing.
    fn result(&self, format: ExportFormat) -> Option<String>;

    /// Release engine resources. No other method is called afterwards.
    fn close(&self) {}
}

/// Creates recognizers; the process-wide engine handle lives behind this.
pub trait RecognizerFactory: Send + Sync {
    fn create_recognizer(
        &self,
        kind: RecognizerKind,
        scale: EngineScale,
        language: &str,
    ) -> Result<Box<dyn Recognizer>>;
}
