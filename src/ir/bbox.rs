//! Axis-aligned boxes in canonical XYXY format.

use serde::Serialize;

use super::coord::Coord;

/// An axis-aligned box in XYXY format (xmin, ymin, xmax, ymax).
///
/// The `TSpace` parameter is either [`Pixel`](super::Pixel) or
/// [`Screen`](super::Screen).
///
/// Note: the constructor does NOT enforce min <= max. Reversed boxes can be
/// represented so that the projection engine and validator can decide what
/// to do with them.
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxXYXY<TSpace> {
    pub min: Coord<TSpace>,
    pub max: Coord<TSpace>,
}

impl<TSpace> BBoxXYXY<TSpace> {
    /// Creates a new box from min and max coordinates.
    #[inline]
    pub fn new(min: Coord<TSpace>, max: Coord<TSpace>) -> Self {
        Self { min, max }
    }

    /// Creates a new box from explicit coordinates.
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            min: Coord::new(xmin, ymin),
            max: Coord::new(xmax, ymax),
        }
    }

    #[inline]
    pub fn xmin(&self) -> f64 {
        self.min.x
    }

    #[inline]
    pub fn ymin(&self) -> f64 {
        self.min.y
    }

    #[inline]
    pub fn xmax(&self) -> f64 {
        self.max.x
    }

    #[inline]
    pub fn ymax(&self) -> f64 {
        self.max.y
    }

    /// Returns the width of the box. Negative if the box is reversed.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Returns the height of the box. Negative if the box is reversed.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns true if all coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Returns true if the box is properly ordered (min <= max for both axes).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Returns true if the box has zero width or zero height.
    ///
    /// Points and lines project to null boxes.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// Returns true if the two boxes share a region of positive area.
    ///
    /// Edges that merely touch do not count, and a null box intersects
    /// nothing.
    pub fn intersects(&self, other: &Self) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        self.xmin() < other.xmax()
            && other.xmin() < self.xmax()
            && self.ymin() < other.ymax()
            && other.ymin() < self.ymax()
    }

    /// Returns the overlap of two boxes, or `None` when they don't
    /// [`intersect`](Self::intersects).
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self::from_xyxy(
            self.xmin().max(other.xmin()),
            self.ymin().max(other.ymin()),
            self.xmax().min(other.xmax()),
            self.ymax().min(other.ymax()),
        ))
    }

    /// Closed-interval overlap test: touching edges count and null boxes
    /// participate.
    pub fn touches(&self, other: &Self) -> bool {
        self.xmin() <= other.xmax()
            && other.xmin() <= self.xmax()
            && self.ymin() <= other.ymax()
            && other.ymin() <= self.ymax()
    }

    /// Converts to XYWH format (x, y, width, height).
    #[inline]
    pub fn to_xywh(&self) -> (f64, f64, f64, f64) {
        (self.xmin(), self.ymin(), self.width(), self.height())
    }
}

impl<TSpace> std::fmt::Debug for BBoxXYXY<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxXYXY")
            .field("xmin", &self.min.x)
            .field("ymin", &self.min.y)
            .field("xmax", &self.max.x)
            .field("ymax", &self.max.y)
            .finish()
    }
}

impl<TSpace> Default for BBoxXYXY<TSpace> {
    fn default() -> Self {
        Self::from_xyxy(0.0, 0.0, 0.0, 0.0)
    }
}

// Hand-written so TSpace doesn't need a Serialize bound.
impl<TSpace> Serialize for BBoxXYXY<TSpace> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("BBoxXYXY", 4)?;
        state.serialize_field("xmin", &self.min.x)?;
        state.serialize_field("ymin", &self.min.y)?;
        state.serialize_field("xmax", &self.max.x)?;
        state.serialize_field("ymax", &self.max.y)?;
        state.end()
    }
}
