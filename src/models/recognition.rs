use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Interpretation of the current stroke by the gesture recognizer.
///
/// `Empty` means the gesture recognizer has not produced anything for this
/// cycle (or was not fed); `None` means it looked and found no gesture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GestureType {
    None,
    #[default]
    Empty,
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
    Scratch,
    Surround,
    Tap,
    DoubleTap,
    LongPress,
}

impl GestureType {
    /// Name used in the engine's gesture export.
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureType::None => "none",
            GestureType::Empty => "",
            GestureType::TopBottom => "top-bottom",
            GestureType::BottomTop => "bottom-top",
            GestureType::LeftRight => "left-right",
            GestureType::RightLeft => "right-left",
            GestureType::Scratch => "scratch",
            GestureType::Surround => "surround",
            GestureType::Tap => "tap",
            GestureType::DoubleTap => "double-tap",
            GestureType::LongPress => "long-press",
        }
    }

    /// Parse an engine gesture name; `None` for names this crate does not
    /// know.
    pub fn from_engine_name(name: &str) -> Option<Self> {
        let gesture = match name {
            "" => GestureType::Empty,
            "none" => GestureType::None,
            "top-bottom" => GestureType::TopBottom,
            "bottom-top" => GestureType::BottomTop,
            "left-right" => GestureType::LeftRight,
            "right-left" => GestureType::RightLeft,
            "scratch" => GestureType::Scratch,
            "surround" => GestureType::Surround,
            "tap" => GestureType::Tap,
            "double-tap" => GestureType::DoubleTap,
            "long-press" => GestureType::LongPress,
            _ => return None,
        };
        Some(gesture)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextRecognitionResult {
    /// Empty until a recognition cycle produced text.
    pub label: String,
    /// Best first.
    pub candidates: Vec<String>,
    /// Surface-space box of the word the label was chosen from.
    pub bounding_box: Option<Rect>,
}

impl TextRecognitionResult {
    /// Text to type: the label, or the first non-empty candidate when the
    /// label is blank.
    pub fn insertable_text(&self) -> Option<&str> {
        if !self.label.is_empty() {
            return Some(&self.label);
        }
        self.candidates
            .iter()
            .map(String::as_str)
            .find(|candidate| !candidate.is_empty())
    }
}

/// Combined output of one recognition cycle, handed to the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    /// The latest pointer event fed before this cycle was an up.
    pub is_pointer_up: bool,
    /// Both recognizers had settled when the result was taken.
    pub is_recognizer_idle: bool,
    /// Bounds of the raw stroke path since the last clear.
    pub stroke_rect: Rect,
    pub stroke_points: Vec<Point>,
    pub gesture_type: GestureType,
    pub text_result: TextRecognitionResult,
}
