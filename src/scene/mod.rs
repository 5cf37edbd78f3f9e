//! What editing and rendering surfaces consume.
//!
//! [`analyze`] runs the whole pipeline over a record table: classification,
//! projection, conflict detection and strict per-row validation. It keeps no
//! state, so calling it again on the same records gives the same
//! [`Analysis`]. [`Pipeline`] adds the reentrancy guard needed when
//! publishing the result edits the table and would trigger another refresh.

mod guard;
mod selection;

pub use guard::{GuardToken, ReentrancyGuard};
pub use selection::{RowSelection, SceneSelection, SelectionSync};

use serde::Serialize;
use tracing::{debug, info};

use crate::intersection::{self, ConflictReport};
use crate::ir::{Record, RowIndex, SegmentId, ShapeKind};
use crate::projection::{self, Segment};
use crate::validation::{self, ValidateOptions, ValidationReport};

/// Everything derived from one record table.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Analysis {
    /// Shape of each row, indexed by row.
    pub shapes: Vec<ShapeKind>,
    /// Visible segments of every row, in row order.
    pub segments: Vec<Segment>,
    pub conflicts: ConflictReport,
    /// Strict-validator errors, one per failing row.
    pub validation: ValidationReport,
}

impl Analysis {
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.as_usize())
    }

    pub fn shape(&self, row: RowIndex) -> Option<ShapeKind> {
        self.shapes.get(row.as_usize()).copied()
    }

    pub fn segments_for_row(&self, row: RowIndex) -> impl Iterator<Item = (SegmentId, &Segment)> {
        self.segments
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.row == row)
            .map(|(i, s)| (SegmentId::new(i), s))
    }

    pub fn is_conflicting(&self, row: RowIndex) -> bool {
        self.conflicts.is_conflicting(row)
    }

    /// Validation messages to show next to `row`.
    pub fn row_messages(&self, row: RowIndex) -> Vec<String> {
        self.validation
            .issues_for_row(row)
            .map(|issue| issue.message.clone())
            .collect()
    }
}

/// Runs the full pipeline over `records`.
pub fn analyze(records: &[Record]) -> Analysis {
    let shapes = records.iter().map(Record::shape).collect();
    let segments = projection::project_records(records);
    let conflicts = intersection::detect_conflicts(&segments);
    let validation = validation::validate_records(records, &ValidateOptions::default());

    debug!(
        rows = records.len(),
        segments = segments.len(),
        overlaps = conflicts.overlaps.len(),
        conflicting_rows = conflicts.conflicting_rows.len(),
        invalid_rows = validation.error_count(),
        "analysis complete"
    );

    Analysis {
        shapes,
        segments,
        conflicts,
        validation,
    }
}

/// Recomputes the analysis from scratch on every edit.
#[derive(Debug, Default)]
pub struct Pipeline {
    guard: ReentrancyGuard,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.guard.is_active()
    }

    /// Analyzes `records` and hands the result to `publish`.
    ///
    /// Returns `false` without doing anything if called from inside another
    /// refresh (for example from `publish` itself).
    pub fn refresh<F>(&self, records: &[Record], publish: F) -> bool
    where
        F: FnOnce(&Analysis),
    {
        let Some(_token) = self.guard.enter() else {
            debug!("refresh already running, ignoring nested call");
            return false;
        };
        let analysis = analyze(records);
        info!(
            rows = records.len(),
            conflicting_rows = analysis.conflicts.conflicting_rows.len(),
            "scene refreshed"
        );
        publish(&analysis);
        true
    }
}
