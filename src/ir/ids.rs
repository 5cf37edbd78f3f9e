//! Newtype indices for back-references into the record table.
//!
//! Rows are identified by their position in the record sequence. Projected
//! segments and overlaps refer back to rows and to each other through these
//! indices; they never own what they point at.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based position of a record in the document's record sequence.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowIndex(pub usize);

impl RowIndex {
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn as_usize(&self) -> usize {
        self.0
    }

    /// The 1-based row number shown to people (table numbering, messages).
    #[inline]
    pub fn number(&self) -> usize {
        self.0 + 1
    }
}

impl fmt::Debug for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowIndex({})", self.0)
    }
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl From<usize> for RowIndex {
    fn from(index: usize) -> Self {
        RowIndex::new(index)
    }
}

/// Position of a segment in a projection's segment arena.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub usize);

impl SegmentId {
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SegmentId({})", self.0)
    }
}

/// Position of an overlap rectangle in a conflict report.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlapId(pub usize);

impl OverlapId {
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for OverlapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OverlapId({})", self.0)
    }
}
