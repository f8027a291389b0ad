// src/shape.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator for the drawable primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Shape,
    Banner,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Shape => "shape",
            ShapeKind::Banner => "banner",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A drawable map element anchored at `(x, y)`.
///
/// When built from a [`Location`](crate::location::Location), `x` holds the
/// latitude and `y` the longitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// A bare anchor point with no payload.
    Shape { x: f64, y: f64 },
    /// A labeled marker. The text may be empty.
    Banner { x: f64, y: f64, text: String },
}

/// One entry of [`Shape::draw_params`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawParam {
    Kind(ShapeKind),
    Coord(f64),
    Text(String),
}

impl fmt::Display for DrawParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawParam::Kind(kind) => write!(f, "{}", kind),
            // Integer rendering, truncated toward zero.
            DrawParam::Coord(value) => write!(f, "{}", value.trunc() as i64),
            DrawParam::Text(text) => f.write_str(text),
        }
    }
}

impl Shape {
    pub fn point(x: f64, y: f64) -> Self {
        Shape::Shape { x, y }
    }

    pub fn banner(x: f64, y: f64, text: impl Into<String>) -> Self {
        Shape::Banner {
            x,
            y,
            text: text.into(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Shape { .. } => ShapeKind::Shape,
            Shape::Banner { .. } => ShapeKind::Banner,
        }
    }

    pub fn x(&self) -> f64 {
        match self {
            Shape::Shape { x, .. } | Shape::Banner { x, .. } => *x,
        }
    }

    pub fn y(&self) -> f64 {
        match self {
            Shape::Shape { y, .. } | Shape::Banner { y, .. } => *y,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x(), self.y())
    }

    /// Moves the anchor. The kind and the text are left untouched.
    pub fn set_position(&mut self, new_x: f64, new_y: f64) {
        match self {
            Shape::Shape { x, y } | Shape::Banner { x, y, .. } => {
                *x = new_x;
                *y = new_y;
            }
        }
    }

    /// The label of a banner, `None` for a bare shape.
    pub fn text(&self) -> Option<&str> {
        match self {
            Shape::Shape { .. } => None,
            Shape::Banner { text, .. } => Some(text),
        }
    }

    /// Ordered draw parameters: `[kind, x, y, ...extra]`.
    ///
    /// A banner appends its text; a bare shape has no extra entries.
    pub fn draw_params(&self) -> Vec<DrawParam> {
        let mut params = vec![
            DrawParam::Kind(self.kind()),
            DrawParam::Coord(self.x()),
            DrawParam::Coord(self.y()),
        ];
        if let Some(text) = self.text() {
            params.push(DrawParam::Text(text.to_string()));
        }
        params
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.draw_params().iter().map(|p| p.to_string()).collect();
        f.write_str(&rendered.join(" "))
    }
}
