//! Record validation for panomark.
//!
//! Two layers live here:
//! - [`check_record`], the strict per-record gate used by the writer and
//!   exposed on its own. It returns a problem value and never panics.
//! - [`validate_records`] / [`validate_document`], which collect per-row
//!   problems (and, for documents, row overlaps) into a [`ValidationReport`].
//!
//! Note that the strict gate refuses point and line boxes even though the
//! classifier and projection engine treat them as legitimate shapes. Files
//! holding such boxes load fine but cannot be saved back.

mod autofix;
mod report;

pub use autofix::{auto_fix, auto_fix_document, AutoFixSummary};
pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::fmt;

use crate::intersection;
use crate::ir::{Document, Record, RowIndex, PANORAMA_HEIGHT, PANORAMA_WIDTH};
use crate::projection;

/// Panorama extent the strict validator checks against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanoramaBounds {
    pub width: i32,
    pub height: i32,
}

impl Default for PanoramaBounds {
    fn default() -> Self {
        Self {
            width: PANORAMA_WIDTH,
            height: PANORAMA_HEIGHT,
        }
    }
}

/// Why [`check_record`] refused a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordProblem {
    NegativeCoordinate,
    OutOfBounds { width: i32, height: i32 },
    EmptyExtent,
}

impl RecordProblem {
    pub fn code(&self) -> IssueCode {
        match self {
            RecordProblem::NegativeCoordinate => IssueCode::NegativeCoordinate,
            RecordProblem::OutOfBounds { .. } => IssueCode::CoordinateOutOfBounds,
            RecordProblem::EmptyExtent => IssueCode::EmptyExtent,
        }
    }
}

impl fmt::Display for RecordProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordProblem::NegativeCoordinate => write!(f, "coordinates cannot be negative"),
            RecordProblem::OutOfBounds { width, height } => {
                write!(f, "coordinates lie outside {}x{}", width, height)
            }
            RecordProblem::EmptyExtent => {
                write!(f, "box has zero or negative width/height")
            }
        }
    }
}

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
    pub bounds: PanoramaBounds,
}

/// Strict geometric check of one record.
///
/// Checks run in a fixed order and the first failure wins:
/// 1. no coordinate is negative;
/// 2. `x1 < width`, `x2 <= width`, `y1 < height`, `y2 <= height` (the far
///    corner may sit exactly on the edge, the near corner may not);
/// 3. `x2 > x1` and `y2 > y1`.
pub fn check_record(record: &Record, bounds: PanoramaBounds) -> Result<(), RecordProblem> {
    if record.x1 < 0 || record.y1 < 0 || record.x2 < 0 || record.y2 < 0 {
        return Err(RecordProblem::NegativeCoordinate);
    }
    if record.x1 >= bounds.width
        || record.x2 > bounds.width
        || record.y1 >= bounds.height
        || record.y2 > bounds.height
    {
        return Err(RecordProblem::OutOfBounds {
            width: bounds.width,
            height: bounds.height,
        });
    }
    if record.x2 <= record.x1 || record.y2 <= record.y1 {
        return Err(RecordProblem::EmptyExtent);
    }
    Ok(())
}

/// Runs [`check_record`] over every row and reports each failure as an error.
pub fn validate_records(records: &[Record], opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();

    for (idx, record) in records.iter().enumerate() {
        if let Err(problem) = check_record(record, opts.bounds) {
            report.add(ValidationIssue::error(
                problem.code(),
                format!(
                    "{} ({}, {}, {}, {})",
                    problem, record.x1, record.y1, record.x2, record.y2
                ),
                IssueContext::Row {
                    row: RowIndex::new(idx),
                },
            ));
        }
    }

    report
}

/// Validates a whole document: strict per-row checks plus one warning per
/// pair of rows whose projected segments overlap.
pub fn validate_document(document: &Document, opts: &ValidateOptions) -> ValidationReport {
    let mut report = validate_records(&document.records, opts);

    let segments = projection::project_records(&document.records);
    let conflicts = intersection::detect_conflicts(&segments);

    for (first, second) in conflicts.row_pairs() {
        report.add(ValidationIssue::warning(
            IssueCode::RowsOverlap,
            format!("rows {} and {} overlap on screen", first, second),
            IssueContext::RowPair { first, second },
        ));
    }

    report
}
