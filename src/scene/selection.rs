//! Selection sync between the row table and the rendered scene.
//!
//! Sync runs one direction at a time. The caller passes an `apply` callback
//! that pushes the translated selection into the other view; if that view
//! reports a selection change back while `apply` runs, the nested call sees
//! the sync in flight and returns `None`.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use super::guard::ReentrancyGuard;
use super::Analysis;
use crate::intersection;
use crate::ir::{OverlapId, RowIndex, SegmentId};

/// What is selected in the rendered scene.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SceneSelection {
    pub segments: BTreeSet<SegmentId>,
    pub overlaps: BTreeSet<OverlapId>,
}

impl SceneSelection {
    pub fn from_segments(segments: impl IntoIterator<Item = SegmentId>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
            overlaps: BTreeSet::new(),
        }
    }

    pub fn from_overlaps(overlaps: impl IntoIterator<Item = OverlapId>) -> Self {
        Self {
            segments: BTreeSet::new(),
            overlaps: overlaps.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.overlaps.is_empty()
    }
}

/// Rows to select in the table after a scene selection, plus the segments
/// that an overlap selection pulled in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RowSelection {
    pub rows: BTreeSet<RowIndex>,
    pub segments: BTreeSet<SegmentId>,
}

#[derive(Debug, Default)]
pub struct SelectionSync {
    guard: ReentrancyGuard,
}

impl SelectionSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_syncing(&self) -> bool {
        self.guard.is_active()
    }

    /// Table to scene: every segment owned by one of `rows`.
    pub fn rows_to_scene<F>(
        &self,
        rows: &BTreeSet<RowIndex>,
        analysis: &Analysis,
        apply: F,
    ) -> Option<BTreeSet<SegmentId>>
    where
        F: FnOnce(&BTreeSet<SegmentId>),
    {
        let Some(_token) = self.guard.enter() else {
            debug!("selection sync in flight, ignoring table selection");
            return None;
        };

        let segments: BTreeSet<SegmentId> = analysis
            .segments
            .iter()
            .enumerate()
            .filter(|(_, s)| rows.contains(&s.row))
            .map(|(i, _)| SegmentId::new(i))
            .collect();
        debug!(
            rows = rows.len(),
            segments = segments.len(),
            "table selection mapped to scene"
        );
        apply(&segments);
        Some(segments)
    }

    /// Scene to table: rows owning the selected segments, plus every row
    /// (and segment) touching a selected overlap region.
    pub fn scene_to_rows<F>(
        &self,
        selection: &SceneSelection,
        analysis: &Analysis,
        apply: F,
    ) -> Option<RowSelection>
    where
        F: FnOnce(&RowSelection),
    {
        let Some(_token) = self.guard.enter() else {
            debug!("selection sync in flight, ignoring scene selection");
            return None;
        };

        let mut result = RowSelection::default();
        for id in &selection.segments {
            if let Some(segment) = analysis.segment(*id) {
                result.rows.insert(segment.row);
            }
        }
        for id in &selection.overlaps {
            let Some(overlap) = analysis.conflicts.overlap(*id) else {
                continue;
            };
            for seg_id in intersection::segments_touching_region(&analysis.segments, &overlap.rect)
            {
                if let Some(segment) = analysis.segment(seg_id) {
                    result.rows.insert(segment.row);
                    result.segments.insert(seg_id);
                }
            }
        }
        debug!(rows = result.rows.len(), "scene selection mapped to table");
        apply(&result);
        Some(result)
    }
}
