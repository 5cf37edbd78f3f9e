//! Shape classification of stored boxes.

use serde::Serialize;
use std::fmt;

/// What a stored box draws as.
///
/// A box with both extents collapsed is a point, one collapsed extent makes
/// a line, anything else is a rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Point,
    Line,
    Rectangle,
}

impl ShapeKind {
    /// Classifies a box by its corner coordinates. Total over all inputs.
    pub fn classify(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let flat_x = x1 == x2;
        let flat_y = y1 == y2;
        match (flat_x, flat_y) {
            (true, true) => ShapeKind::Point,
            (true, false) | (false, true) => ShapeKind::Line,
            (false, false) => ShapeKind::Rectangle,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Point => "point",
            ShapeKind::Line => "line",
            ShapeKind::Rectangle => "rectangle",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
