pub mod recognition;
pub mod stroke;

pub use recognition::{GestureType, RecognitionResult, TextRecognitionResult};
pub use stroke::{PointerEvent, StrokePoint, ToolKind};
