//! Conflict report produced by the intersection detector.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::ir::{BBoxXYXY, OverlapId, RowIndex, Screen, SegmentId};

/// One intersecting pair of segments and the region they share.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Overlap {
    pub id: OverlapId,
    /// The lower-indexed segment of the pair.
    pub first: SegmentId,
    pub second: SegmentId,
    pub first_row: RowIndex,
    pub second_row: RowIndex,
    /// Geometric intersection of the two segments.
    pub rect: BBoxXYXY<Screen>,
}

impl Overlap {
    /// True if both segments come from the same row.
    pub fn is_same_row(&self) -> bool {
        self.first_row == self.second_row
    }
}

/// Rows in conflict plus every overlap rectangle, in pair order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConflictReport {
    pub conflicting_rows: BTreeSet<RowIndex>,
    pub overlaps: Vec<Overlap>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.overlaps.is_empty()
    }

    pub fn is_conflicting(&self, row: RowIndex) -> bool {
        self.conflicting_rows.contains(&row)
    }

    pub fn overlap(&self, id: OverlapId) -> Option<&Overlap> {
        self.overlaps.get(id.as_usize())
    }

    /// Distinct pairs of different rows that overlap, each as `(lower, higher)`.
    pub fn row_pairs(&self) -> Vec<(RowIndex, RowIndex)> {
        let pairs: BTreeSet<(RowIndex, RowIndex)> = self
            .overlaps
            .iter()
            .filter(|o| !o.is_same_row())
            .map(|o| {
                if o.first_row < o.second_row {
                    (o.first_row, o.second_row)
                } else {
                    (o.second_row, o.first_row)
                }
            })
            .collect();
        pairs.into_iter().collect()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.overlaps.is_empty() {
            return writeln!(f, "No overlaps");
        }

        let rows: Vec<String> = self.conflicting_rows.iter().map(|r| r.to_string()).collect();
        writeln!(f, "Conflicting rows: {}", rows.join(", "))?;
        for overlap in &self.overlaps {
            writeln!(
                f,
                "  rows {} x {}: ({:.2}, {:.2}, {:.2}, {:.2})",
                overlap.first_row,
                overlap.second_row,
                overlap.rect.xmin(),
                overlap.rect.ymin(),
                overlap.rect.xmax(),
                overlap.rect.ymax()
            )?;
        }
        Ok(())
    }
}
