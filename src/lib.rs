//! Write-to-type: edit text fields with pen or finger strokes.
//!
//! Strokes are routed into a text recognizer and a gesture recognizer at the
//! same time. A background poller turns their output into
//! [`RecognitionResult`]s, a commit scheduler finalises the recognition after
//! the pen has rested, and the [`Dispatcher`] maps each result onto one edit
//! of the focused text field.
//!
//! The recognition engine, the ink surface and the text fields themselves are
//! collaborators supplied by the embedder through the traits in [`engine`] and
//! [`host`].

mod commit;
pub mod engine;
mod focus;
pub mod geometry;
pub mod host;
mod interpreter;
mod manager;
pub mod models;
mod recognition;
mod settings;
mod utils;

pub use kurbo::{self, Point, Rect};

pub use commit::{CommitScheduler, CommitState};
pub use engine::{ExportFormat, Recognizer, RecognizerFactory, RecognizerKind};
pub use focus::{FocusResolver, FocusState};
pub use host::{DebugListener, FieldId, Highlight, InkSurface, MonospaceTextHost, TextFieldHost};
pub use interpreter::{EditAction, GestureInterpreter, Interpretation};
pub use manager::{DispatchReport, Dispatcher, SessionHandle, WriteToTypeManager};
pub use models::{
    GestureType, PointerEvent, RecognitionResult, StrokePoint, TextRecognitionResult, ToolKind,
};
pub use settings::{SettingsStore, WriteToTypeSettings};

/// Initialise `env_logger` for hosts that do not install their own logger.
///
/// Reads `RUST_LOG`; defaults to `info`. Calling it twice is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}
