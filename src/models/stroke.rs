use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PointerEvent {
    Down,
    Move,
    Up,
}

/// Input tool reported by the capture layer. A passive stylus reports as
/// `Finger`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ToolKind {
    #[default]
    Finger,
    Stylus,
    Mouse,
    Eraser,
}

impl ToolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Finger => "finger",
            ToolKind::Stylus => "stylus",
            ToolKind::Mouse => "mouse",
            ToolKind::Eraser => "eraser",
        }
    }
}

/// One captured pointer sample in surface pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrokePoint {
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
    pub timestamp_ms: i64,
    pub event: PointerEvent,
    #[serde(default)]
    pub tool: ToolKind,
}

impl StrokePoint {
    pub fn new(x: f32, y: f32, pressure: f32, timestamp_ms: i64, event: PointerEvent) -> Self {
        Self {
            x,
            y,
            pressure,
            timestamp_ms,
            event,
            tool: ToolKind::Finger,
        }
    }

    /// Sample stamped with the current wall-clock time.
    pub fn now(x: f32, y: f32, pressure: f32, event: PointerEvent) -> Self {
        Self::new(x, y, pressure, Utc::now().timestamp_millis(), event)
    }

    pub fn with_tool(mut self, tool: ToolKind) -> Self {
        self.tool = tool;
        self
    }

    pub fn position(&self) -> kurbo::Point {
        kurbo::Point::new(f64::from(self.x), f64::from(self.y))
    }
}
