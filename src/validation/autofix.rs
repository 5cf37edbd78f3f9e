//! Best-effort normalization of loaded records.

use tracing::debug;

use super::PanoramaBounds;
use crate::ir::{Document, Record};

/// What an auto-fix pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AutoFixSummary {
    /// Rows whose coordinates were modified.
    pub rows_changed: usize,
}

/// Auto-fixes a document against the standard panorama bounds.
pub fn auto_fix_document(document: &mut Document) -> AutoFixSummary {
    auto_fix(&mut document.records, PanoramaBounds::default())
}

/// Swaps reversed corner pairs, then clamps every coordinate into
/// `[0, width - 1]` / `[0, height - 1]`.
///
/// This never fails. Clamping can collapse a box into a line or point, which
/// the strict validator will still refuse on save.
pub fn auto_fix(records: &mut [Record], bounds: PanoramaBounds) -> AutoFixSummary {
    let max_x = (bounds.width - 1).max(0);
    let max_y = (bounds.height - 1).max(0);
    let mut summary = AutoFixSummary::default();

    for (idx, record) in records.iter_mut().enumerate() {
        let before = *record;
        record.sort_corners();
        record.x1 = record.x1.clamp(0, max_x);
        record.x2 = record.x2.clamp(0, max_x);
        record.y1 = record.y1.clamp(0, max_y);
        record.y2 = record.y2.clamp(0, max_y);

        if *record != before {
            debug!(
                row = idx + 1,
                from = ?(before.x1, before.y1, before.x2, before.y2),
                to = ?(record.x1, record.y1, record.x2, record.y2),
                "auto-fixed record"
            );
            summary.rows_changed += 1;
        }
    }

    summary
}
