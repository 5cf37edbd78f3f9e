//! Coordinate space marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to distinguish
//! between stored panorama boxes and projected on-screen segments at compile
//! time.

use std::fmt;

/// Marker type for stored panorama pixel coordinates.
///
/// These are the boxes exactly as written in a file: integer pixels on the
/// 3840x512 panorama, before any azimuth/elevation offset is applied.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for projected screen coordinates.
///
/// Screen coordinates are produced by the projection engine: offset, wrapped
/// around both periods and clipped to the visible band.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
