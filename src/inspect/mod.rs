//! Document inspection and statistics.
//!
//! Produces a structured report with the header fields, a shape-kind
//! histogram, box extent statistics and a summary of what the projection and
//! intersection passes found.

mod report;

pub use report::{ConflictSummary, ExtentStats, HeaderSection, InspectReport, ShapeSection};

use crate::ir::{Document, RowIndex, ShapeKind};
use crate::scene::{self, Analysis};

/// Options for document inspection.
#[derive(Clone, Debug)]
pub struct InspectOptions {
    /// Width of histogram bars (in characters).
    pub bar_width: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self { bar_width: 20 }
    }
}

/// Inspect a document and produce a detailed report.
pub fn inspect_document(document: &Document, opts: &InspectOptions) -> InspectReport {
    let analysis = scene::analyze(&document.records);

    InspectReport {
        header: compute_header(document),
        shapes: compute_shapes(&analysis),
        extents: compute_extents(document, &analysis),
        conflicts: ConflictSummary {
            conflicting_rows: analysis
                .conflicts
                .conflicting_rows
                .iter()
                .map(RowIndex::number)
                .collect(),
            overlaps: analysis.conflicts.overlaps.len(),
        },
        bar_width: opts.bar_width,
    }
}

fn compute_header(document: &Document) -> HeaderSection {
    let header = &document.header;
    HeaderSection {
        machine_number: header.machine_number,
        date: header.date.map(|d| d.format("%d.%m.%Y").to_string()),
        time: header.time.map(|t| t.format("%H:%M:%S%.3f").to_string()),
        version: header.version,
        comments: header.comments.clone(),
    }
}

fn compute_shapes(analysis: &Analysis) -> ShapeSection {
    let mut section = ShapeSection {
        total: analysis.shapes.len(),
        ..Default::default()
    };
    for shape in &analysis.shapes {
        match shape {
            ShapeKind::Point => section.points += 1,
            ShapeKind::Line => section.lines += 1,
            ShapeKind::Rectangle => section.rectangles += 1,
        }
    }
    section
}

fn compute_extents(document: &Document, analysis: &Analysis) -> ExtentStats {
    let mut stats = ExtentStats {
        total: document.records.len(),
        invalid: analysis.validation.error_count(),
        ..Default::default()
    };

    for (row, record) in document.rows() {
        if record.azimuth != 0.0 || record.elevation != 0.0 {
            stats.offset += 1;
        }

        if record.is_ordered() {
            let width = record.x2.saturating_sub(record.x1);
            let height = record.y2.saturating_sub(record.y1);
            stats.min_width = Some(stats.min_width.map_or(width, |m| m.min(width)));
            stats.max_width = Some(stats.max_width.map_or(width, |m| m.max(width)));
            stats.min_height = Some(stats.min_height.map_or(height, |m| m.min(height)));
            stats.max_height = Some(stats.max_height.map_or(height, |m| m.max(height)));
        }

        let mut spans: Vec<(f64, f64)> = Vec::new();
        for (_, segment) in analysis.segments_for_row(row) {
            let span = (segment.rect.xmin(), segment.rect.xmax());
            if !spans.contains(&span) {
                spans.push(span);
            }
        }
        match spans.len() {
            0 => stats.hidden += 1,
            1 => {}
            _ => stats.seam_crossing += 1,
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Header, Record};
    use chrono::{NaiveDate, NaiveTime};

    fn sample_document() -> Document {
        let header = Header::new(
            7,
            NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date"),
            NaiveTime::from_hms_milli_opt(14, 22, 7, 250).expect("valid time"),
        )
        .with_comment("survey");
        Document::new(
            header,
            vec![
                Record::new(0, 0, 100, 100),
                Record::new(50, 50, 150, 150),
                Record::new(3700, 10, 3800, 20).with_offset(9.375, 0.0),
                Record::new(10, 10, 10, 10).with_offset(0.0, -90.0),
                Record::new(200, 30, 260, 30),
            ],
        )
    }

    #[test]
    fn header_is_formatted_like_the_file() {
        let report = inspect_document(&sample_document(), &InspectOptions::default());
        assert_eq!(report.header.machine_number, 7);
        assert_eq!(report.header.date.as_deref(), Some("05.03.2024"));
        assert_eq!(report.header.time.as_deref(), Some("14:22:07.250"));
        assert_eq!(report.header.comments, vec!["survey"]);
    }

    #[test]
    fn shapes_are_counted() {
        let report = inspect_document(&sample_document(), &InspectOptions::default());
        assert_eq!(report.shapes.total, 5);
        assert_eq!(report.shapes.rectangles, 3);
        assert_eq!(report.shapes.points, 1);
        assert_eq!(report.shapes.lines, 1);
    }

    #[test]
    fn extents_and_projection_outcomes() {
        let report = inspect_document(&sample_document(), &InspectOptions::default());
        let e = &report.extents;
        assert_eq!(e.offset, 2);
        assert_eq!(e.invalid, 2);
        assert_eq!(e.seam_crossing, 1);
        // The point is pushed 960px below the band.
        assert_eq!(e.hidden, 1);
        assert_eq!(e.min_width, Some(0));
        assert_eq!(e.max_width, Some(100));
        assert_eq!(e.max_height, Some(100));
    }

    #[test]
    fn conflicts_use_row_numbers() {
        let report = inspect_document(&sample_document(), &InspectOptions::default());
        // Row 3's right piece (0..60, 10..20) sits inside row 1.
        assert_eq!(report.conflicts.conflicting_rows, vec![1, 2, 3]);
        assert_eq!(report.conflicts.overlaps, 2);
    }

    #[test]
    fn empty_document() {
        let report = inspect_document(&Document::default(), &InspectOptions::default());
        assert_eq!(report.shapes.total, 0);
        assert_eq!(report.extents.min_width, None);
        assert!(report.header.date.is_none());
        let text = report.to_string();
        assert!(text.contains("No records"));
    }
}
