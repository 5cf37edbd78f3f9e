//! Data model for panorama annotation files.
//!
//! A [`Document`] is a [`Header`] plus an ordered list of [`Record`]s. Each
//! record is an integer pixel box on the 3840x512 panorama together with an
//! azimuth/elevation offset that the projection engine applies before the box
//! is shown.
//!
//! # Design Principles
//!
//! 1. **Type Safety**: marker types keep stored panorama boxes
//!    ([`Pixel`]) apart from projected segments ([`Screen`]).
//!
//! 2. **Positional identity**: rows are referenced by [`RowIndex`], never by
//!    a stored id, so editing surfaces stay the sole owners of records.
//!
//! 3. **Permissive Construction**: model types accept reversed or
//!    out-of-range boxes. The parser and validator decide what is legal.
//!
//! # Example
//!
//! ```
//! use panomark::ir::{Document, Header, Record, ShapeKind};
//!
//! let document = Document {
//!     header: Header::default().with_comment("survey 7"),
//!     records: vec![Record::new(0, 0, 100, 100).with_offset(90.0, 0.0)],
//! };
//! assert_eq!(document.records[0].shape(), ShapeKind::Rectangle);
//! ```

mod bbox;
mod coord;
mod ids;
pub mod io_pano_csv;
mod model;
mod shape;
mod space;

// Re-export core types for convenient access
pub use bbox::BBoxXYXY;
pub use coord::Coord;
pub use ids::{OverlapId, RowIndex, SegmentId};
pub use model::{
    Document, Header, Record, DEG_PER_PX, PANORAMA_HEIGHT, PANORAMA_WIDTH, SUPPORTED_VERSION,
};
pub use shape::ShapeKind;
pub use space::{Pixel, Screen};
