//! Projection of stored records onto the visible panorama band.
//!
//! Each record is shifted by its azimuth/elevation offset, wrapped around the
//! horizontal seam, wrapped vertically, and clipped to the `[0, 512]` band.
//! The result is a flat arena of [`Segment`]s, each pointing back at the row
//! it came from. One record yields between zero and four segments:
//!
//! - a span crossing the `0/3840` seam splits into a left and a right piece;
//! - a vertical run that wraps splits into a top and a bottom piece;
//! - pieces that land entirely outside the band are dropped.
//!
//! The vertical wrap period is the panorama *width*, not its height. Only the
//! first 512 pixels of that period are visible.

use serde::Serialize;
use tracing::debug;

use crate::ir::{
    BBoxXYXY, Coord, Record, RowIndex, Screen, ShapeKind, DEG_PER_PX, PANORAMA_HEIGHT,
    PANORAMA_WIDTH,
};

/// Horizontal wrap period in pixels.
pub const HORIZONTAL_PERIOD: f64 = PANORAMA_WIDTH as f64;

/// Vertical wrap period in pixels. Equal to the panorama width.
pub const VERTICAL_PERIOD: f64 = PANORAMA_WIDTH as f64;

/// Height of the visible band in pixels.
pub const BAND_HEIGHT: f64 = PANORAMA_HEIGHT as f64;

/// One visible, axis-aligned piece of a projected record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Segment {
    /// Row the segment was projected from. Lookup only.
    pub row: RowIndex,
    /// Screen-space rectangle, always ordered. Points and lines have zero
    /// width and/or height.
    pub rect: BBoxXYXY<Screen>,
    /// Shape of the stored record, not of the clipped piece.
    pub shape: ShapeKind,
}

/// Maps `value` into `[0, period)` with floored modular arithmetic.
pub fn wrap(value: f64, period: f64) -> f64 {
    let r = value.rem_euclid(period);
    // rem_euclid can round up to `period` for tiny negative inputs.
    if r >= period {
        0.0
    } else {
        r
    }
}

#[inline]
pub fn wrap_x(x: f64) -> f64 {
    wrap(x, HORIZONTAL_PERIOD)
}

#[inline]
pub fn wrap_y(y: f64) -> f64 {
    wrap(y, VERTICAL_PERIOD)
}

/// Pixel offset `(dx, dy)` for a record's pose. Positive elevation moves the
/// box up, so `dy` has the opposite sign.
pub fn pixel_offset(azimuth: f64, elevation: f64) -> (f64, f64) {
    (azimuth / DEG_PER_PX, -elevation / DEG_PER_PX)
}

/// Projects every record, in row order.
pub fn project_records(records: &[Record]) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        project_into(RowIndex::new(idx), record, &mut segments);
    }
    segments
}

/// Projects a single record.
///
/// Reversed boxes (`x1 > x2` or `y1 > y2`) and offsets that are not finite
/// in pixels yield no segments.
pub fn project_record(row: RowIndex, record: &Record) -> Vec<Segment> {
    let mut segments = Vec::new();
    project_into(row, record, &mut segments);
    segments
}

fn project_into(row: RowIndex, record: &Record, out: &mut Vec<Segment>) {
    if !record.is_ordered() {
        debug!(row = row.number(), "skipping reversed record");
        return;
    }
    let (dx, dy) = pixel_offset(record.azimuth, record.elevation);
    if !dx.is_finite() || !dy.is_finite() {
        debug!(row = row.number(), "skipping record with non-finite offset");
        return;
    }

    let shape = record.shape();
    let stored = record.bbox();
    let near = stored.min.translated(dx, dy);
    let far = stored.max.translated(dx, dy);
    let x1 = wrap_x(near.x);
    let x2 = wrap_x(far.x);
    let y1 = near.y;
    let y2 = far.y;

    let mut emit = VerticalRuns {
        row,
        shape,
        y1,
        y2,
        out,
    };

    if (x1 - x2).abs() > HORIZONTAL_PERIOD / 2.0 {
        // The span straddles the seam.
        if x1 < HORIZONTAL_PERIOD {
            emit.span(x1, HORIZONTAL_PERIOD);
        }
        if 0.0 < x2 {
            emit.span(0.0, x2);
        }
    } else {
        emit.span(x1.min(x2), x1.max(x2));
    }
}

/// Emits the vertical pieces of one horizontal span.
struct VerticalRuns<'a> {
    row: RowIndex,
    shape: ShapeKind,
    y1: f64,
    y2: f64,
    out: &'a mut Vec<Segment>,
}

impl VerticalRuns<'_> {
    fn span(&mut self, xa: f64, xb: f64) {
        let wy1 = wrap_y(self.y1);
        let wy2 = wrap_y(self.y2);
        if wy1 <= wy2 {
            self.clip(xa, xb, wy1, wy2);
        } else {
            self.clip(xa, xb, wy1, VERTICAL_PERIOD);
            self.clip(xa, xb, 0.0, wy2);
        }
    }

    fn clip(&mut self, xa: f64, xb: f64, ya: f64, yb: f64) {
        let mut a = ya.clamp(0.0, BAND_HEIGHT);
        let mut b = yb.clamp(0.0, BAND_HEIGHT);
        // A zero-length run survives only strictly inside the band.
        if a == b && (a <= 0.0 || a >= BAND_HEIGHT) {
            return;
        }
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        if b <= 0.0 || a >= BAND_HEIGHT {
            return;
        }

        let segment = Segment {
            row: self.row,
            rect: BBoxXYXY::new(Coord::new(xa, a), Coord::new(xb, b)),
            shape: self.shape,
        };
        debug!(
            row = self.row.number(),
            shape = %self.shape,
            rect = ?segment.rect,
            "visible segment"
        );
        self.out.push(segment);
    }
}
