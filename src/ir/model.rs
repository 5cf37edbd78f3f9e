//! Core document model: one file's header plus its ordered records.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use super::bbox::BBoxXYXY;
use super::ids::RowIndex;
use super::shape::ShapeKind;
use super::space::Pixel;

/// Panorama width in pixels (one full 360° turn).
pub const PANORAMA_WIDTH: i32 = 3840;

/// Panorama height in pixels (the visible vertical band).
pub const PANORAMA_HEIGHT: i32 = 512;

/// The only protocol version this crate reads and writes.
pub const SUPPORTED_VERSION: i32 = 1;

/// Degrees of azimuth covered by one horizontal pixel.
pub const DEG_PER_PX: f64 = 360.0 / PANORAMA_WIDTH as f64;

/// A complete annotation file: header metadata and the record table.
///
/// Records are identified by position; [`RowIndex`] is the only identity
/// shared with editing and rendering surfaces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub header: Header,
    pub records: Vec<Record>,
}

impl Document {
    pub fn new(header: Header, records: Vec<Record>) -> Self {
        Self { header, records }
    }

    /// Returns the record at `row`, if any.
    pub fn row(&self, row: RowIndex) -> Option<&Record> {
        self.records.get(row.as_usize())
    }

    /// Iterates records together with their row index.
    pub fn rows(&self) -> impl Iterator<Item = (RowIndex, &Record)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (RowIndex::new(i), record))
    }
}

/// File-level metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// Number of the machine that produced the file.
    pub machine_number: i32,

    /// Capture date. `None` means unset or invalid; writers substitute today.
    pub date: Option<NaiveDate>,

    /// Capture time with millisecond precision. `None` means unset or
    /// invalid; writers substitute the current time.
    pub time: Option<NaiveTime>,

    /// Protocol version as read from the file.
    pub version: i32,

    /// Free-text comment lines, in file order. Duplicates are kept.
    pub comments: Vec<String>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            machine_number: 0,
            date: None,
            time: None,
            version: SUPPORTED_VERSION,
            comments: Vec::new(),
        }
    }
}

impl Header {
    pub fn new(machine_number: i32, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            machine_number,
            date: Some(date),
            time: Some(time),
            ..Default::default()
        }
    }

    /// Adds a comment line.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }
}

/// One annotation: a stored pixel box plus the pose offset applied when it
/// is projected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Record {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    /// Horizontal offset in degrees.
    pub azimuth: f64,
    /// Vertical offset in degrees. Positive moves the box up the screen.
    pub elevation: f64,
}

impl Record {
    /// Creates a record with no pose offset.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            azimuth: 0.0,
            elevation: 0.0,
        }
    }

    /// Sets the azimuth/elevation offset.
    pub fn with_offset(mut self, azimuth: f64, elevation: f64) -> Self {
        self.azimuth = azimuth;
        self.elevation = elevation;
        self
    }

    pub fn shape(&self) -> ShapeKind {
        ShapeKind::classify(self.x1, self.y1, self.x2, self.y2)
    }

    /// The stored box in panorama pixel space.
    pub fn bbox(&self) -> BBoxXYXY<Pixel> {
        BBoxXYXY::from_xyxy(
            self.x1 as f64,
            self.y1 as f64,
            self.x2 as f64,
            self.y2 as f64,
        )
    }

    /// True when `x1 <= x2` and `y1 <= y2`.
    pub fn is_ordered(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Swaps reversed corner pairs in place. Returns true if anything moved.
    pub fn sort_corners(&mut self) -> bool {
        let mut changed = false;
        if self.x1 > self.x2 {
            std::mem::swap(&mut self.x1, &mut self.x2);
            changed = true;
        }
        if self.y1 > self.y2 {
            std::mem::swap(&mut self.y1, &mut self.y2);
            changed = true;
        }
        changed
    }
}
