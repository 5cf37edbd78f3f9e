//! All-pairs overlap detection over projected segments.
//!
//! Every pair of segments `(i, j)` with `i < j` is tested, whichever rows they
//! belong to. A hit marks both owning rows as conflicting and records the
//! overlap rectangle. Conflict is pairwise only: two rows that each overlap a
//! third are not linked to each other unless they overlap too.
//!
//! The pair test is open: touching edges don't count, and a point or line
//! segment never intersects anything. Region hit-testing (used to turn a
//! selected overlap back into rows) is closed, so it does pick up the segments
//! that bound the region and degenerate ones lying on it.

mod report;

pub use report::{ConflictReport, Overlap};

use std::collections::BTreeSet;

use tracing::debug;

use crate::ir::{BBoxXYXY, OverlapId, RowIndex, Screen, SegmentId};
use crate::projection::Segment;

/// Tests every segment pair and collects conflicts.
///
/// Runs in `O(n²)` over the number of segments.
pub fn detect_conflicts(segments: &[Segment]) -> ConflictReport {
    let mut report = ConflictReport::default();

    for (i, a) in segments.iter().enumerate() {
        for (j, b) in segments.iter().enumerate().skip(i + 1) {
            let Some(rect) = a.rect.intersection(&b.rect) else {
                continue;
            };
            debug!(
                first_row = a.row.number(),
                second_row = b.row.number(),
                area = rect.area(),
                "segments intersect"
            );
            report.conflicting_rows.insert(a.row);
            report.conflicting_rows.insert(b.row);
            report.overlaps.push(Overlap {
                id: OverlapId::new(report.overlaps.len()),
                first: SegmentId::new(i),
                second: SegmentId::new(j),
                first_row: a.row,
                second_row: b.row,
                rect,
            });
        }
    }

    report
}

/// Ids of the segments that touch `region`.
pub fn segments_touching_region(
    segments: &[Segment],
    region: &BBoxXYXY<Screen>,
) -> Vec<SegmentId> {
    segments
        .iter()
        .enumerate()
        .filter(|(_, s)| s.rect.touches(region))
        .map(|(i, _)| SegmentId::new(i))
        .collect()
}

/// Rows owning at least one segment that touches `region`.
pub fn rows_touching_region(segments: &[Segment], region: &BBoxXYXY<Screen>) -> BTreeSet<RowIndex> {
    segments
        .iter()
        .filter(|s| s.rect.touches(region))
        .map(|s| s.row)
        .collect()
}
