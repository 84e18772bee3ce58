use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed set of primitive actions the dispatcher can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetaOperation {
    Click,
    DoubleClick,
    RightClick,
    Type,
    Hover,
    ScrollDown,
    ScrollUp,
    KeyPress,
    Launch,
    End,
}

impl MetaOperation {
    pub fn name(self) -> &'static str {
        match self {
            MetaOperation::Click => "CLICK",
            MetaOperation::DoubleClick => "DOUBLE_CLICK",
            MetaOperation::RightClick => "RIGHT_CLICK",
            MetaOperation::Type => "TYPE",
            MetaOperation::Hover => "HOVER",
            MetaOperation::ScrollDown => "SCROLL_DOWN",
            MetaOperation::ScrollUp => "SCROLL_UP",
            MetaOperation::KeyPress => "KEY_PRESS",
            MetaOperation::Launch => "LAUNCH",
            MetaOperation::End => "END",
        }
    }
}

impl fmt::Display for MetaOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Argument names a grounded operation may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Box,
    Text,
    Key,
    App,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Box => "box",
            Field::Text => "text",
            Field::Key => "key",
            Field::App => "app",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw operation as emitted by the grounding model.
///
/// `bbox` holds permille coordinates `[left, top, right, bottom]` in `0..=1000`.
/// String fields may still carry the quote pair the model wraps them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundedOperation {
    pub operation: String,
    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
}

impl GroundedOperation {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..Self::default()
        }
    }

    pub fn with_box(mut self, bbox: [f64; 4]) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    pub fn has_field(&self, field: Field) -> bool {
        match field {
            Field::Box => self.bbox.is_some(),
            Field::Text => self.text.is_some(),
            Field::Key => self.key.is_some(),
            Field::App => self.app.is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Absolute screen position in physical pixels. Halves survive the midpoint
/// computation; [`ScreenPoint::to_pixels`] truncates them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_pixels(self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

/// An operation with every required field resolved, ready for a handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "meta", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NormalizedOperation {
    Click { at: ScreenPoint },
    DoubleClick { at: ScreenPoint },
    RightClick { at: ScreenPoint },
    Type { at: ScreenPoint, text: String },
    Hover { at: ScreenPoint },
    ScrollDown { at: ScreenPoint },
    ScrollUp { at: ScreenPoint },
    KeyPress { key: String },
    Launch { app: String },
    End,
}

impl NormalizedOperation {
    pub fn meta(&self) -> MetaOperation {
        match self {
            NormalizedOperation::Click { .. } => MetaOperation::Click,
            NormalizedOperation::DoubleClick { .. } => MetaOperation::DoubleClick,
            NormalizedOperation::RightClick { .. } => MetaOperation::RightClick,
            NormalizedOperation::Type { .. } => MetaOperation::Type,
            NormalizedOperation::Hover { .. } => MetaOperation::Hover,
            NormalizedOperation::ScrollDown { .. } => MetaOperation::ScrollDown,
            NormalizedOperation::ScrollUp { .. } => MetaOperation::ScrollUp,
            NormalizedOperation::KeyPress { .. } => MetaOperation::KeyPress,
            NormalizedOperation::Launch { .. } => MetaOperation::Launch,
            NormalizedOperation::End => MetaOperation::End,
        }
    }

    pub fn point(&self) -> Option<ScreenPoint> {
        match self {
            NormalizedOperation::Click { at }
            | NormalizedOperation::DoubleClick { at }
            | NormalizedOperation::RightClick { at }
            | NormalizedOperation::Type { at, .. }
            | NormalizedOperation::Hover { at }
            | NormalizedOperation::ScrollDown { at }
            | NormalizedOperation::ScrollUp { at } => Some(*at),
            NormalizedOperation::KeyPress { .. }
            | NormalizedOperation::Launch { .. }
            | NormalizedOperation::End => None,
        }
    }
}
