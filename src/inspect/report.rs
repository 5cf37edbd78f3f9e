//! Inspect report types and terminal formatting.

use serde::Serialize;
use std::fmt;

/// The result of inspecting a document.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    pub header: HeaderSection,
    pub shapes: ShapeSection,
    pub extents: ExtentStats,
    pub conflicts: ConflictSummary,
    /// Display options for formatting.
    #[serde(skip)]
    pub(crate) bar_width: usize,
}

/// Header fields as they appear in the file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct HeaderSection {
    pub machine_number: i32,
    /// `dd.MM.yyyy`, or `None` if unset.
    pub date: Option<String>,
    /// `HH:mm:ss.mmm`, or `None` if unset.
    pub time: Option<String>,
    pub version: i32,
    pub comments: Vec<String>,
}

/// Shape-kind histogram.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ShapeSection {
    pub total: usize,
    pub points: usize,
    pub lines: usize,
    pub rectangles: usize,
}

/// Box extent statistics and projection outcomes.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ExtentStats {
    /// Total records analyzed.
    pub total: usize,
    /// Records with a non-zero azimuth or elevation.
    pub offset: usize,
    /// Records the strict validator refuses.
    pub invalid: usize,
    /// Records split at the horizontal seam.
    pub seam_crossing: usize,
    /// Records with no visible segment.
    pub hidden: usize,
    pub min_width: Option<i32>,
    pub max_width: Option<i32>,
    pub min_height: Option<i32>,
    pub max_height: Option<i32>,
}

/// Overlap summary, with 1-based row numbers.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConflictSummary {
    pub conflicting_rows: Vec<usize>,
    pub overlaps: usize,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "╭─────────────────────────────────────────────────────────────╮")?;
        writeln!(f, "│              Panorama Annotation Report                     │")?;
        writeln!(f, "╰─────────────────────────────────────────────────────────────╯")?;
        writeln!(f)?;

        self.fmt_header(f)?;
        writeln!(f)?;
        self.fmt_shapes(f)?;
        writeln!(f)?;
        self.fmt_extents(f)?;

        Ok(())
    }
}

impl InspectReport {
    fn fmt_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.header;

        writeln!(f, "┌─ Header ──────────────────────────────────────────────────")?;
        writeln!(f, "│   Machine:       {}", h.machine_number)?;
        writeln!(f, "│   Date:          {}", h.date.as_deref().unwrap_or("(unset)"))?;
        writeln!(f, "│   Time:          {}", h.time.as_deref().unwrap_or("(unset)"))?;
        writeln!(f, "│   Version:       {}", h.version)?;
        if h.comments.is_empty() {
            writeln!(f, "│   Comments:      none")?;
        } else {
            writeln!(f, "│   Comments:")?;
            for comment in &h.comments {
                writeln!(f, "│     {}", comment)?;
            }
        }
        writeln!(f, "└───────────────────────────────────────────────────────────")?;

        Ok(())
    }

    fn fmt_shapes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.shapes;

        writeln!(f, "┌─ Shapes ({}) ", format_number(s.total))?;
        if s.total == 0 {
            writeln!(f, "│   No records.")?;
        } else {
            let max_count = s.points.max(s.lines).max(s.rectangles);
            for (label, count) in [
                ("rectangle", s.rectangles),
                ("line", s.lines),
                ("point", s.points),
            ] {
                writeln!(
                    f,
                    "│   {:<10} {:>7} {:>6}  {}",
                    label,
                    format_number(count),
                    fmt_percent(count, s.total),
                    render_bar(count, max_count, self.bar_width)
                )?;
            }
        }
        writeln!(f, "└───────────────────────────────────────────────────────────")?;

        Ok(())
    }

    fn fmt_extents(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.extents;

        writeln!(f, "┌─ Boxes ───────────────────────────────────────────────────")?;
        if e.total == 0 {
            writeln!(f, "│   No records.")?;
            writeln!(f, "└───────────────────────────────────────────────────────────")?;
            return Ok(());
        }

        if let (Some(min_w), Some(max_w), Some(min_h), Some(max_h)) =
            (e.min_width, e.max_width, e.min_height, e.max_height)
        {
            writeln!(f, "│   Width  (px):    min {:>6}    max {:>6}", min_w, max_w)?;
            writeln!(f, "│   Height (px):    min {:>6}    max {:>6}", min_h, max_h)?;
        } else {
            writeln!(f, "│   Width/Height:   no ordered boxes to measure")?;
        }
        writeln!(
            f,
            "│   With offset:    {:>7} / {:>7}",
            format_number(e.offset),
            format_number(e.total)
        )?;
        writeln!(
            f,
            "│   Seam crossing:  {:>7} / {:>7}",
            format_number(e.seam_crossing),
            format_number(e.total)
        )?;
        writeln!(
            f,
            "│   Not visible:    {:>7} / {:>7}",
            format_number(e.hidden),
            format_number(e.total)
        )?;

        let c = &self.conflicts;
        if e.invalid > 0 {
            writeln!(
                f,
                "│   ⚠ Not savable:  {:>7} / {:>7}  ({})",
                format_number(e.invalid),
                format_number(e.total),
                fmt_percent(e.invalid, e.total)
            )?;
        }
        if c.conflicting_rows.is_empty() {
            writeln!(f, "│   ✓ No overlaps")?;
        } else {
            let rows: Vec<String> = c.conflicting_rows.iter().map(|r| r.to_string()).collect();
            writeln!(
                f,
                "│   ⚠ Overlaps:     {:>7}  (rows {})",
                format_number(c.overlaps),
                rows.join(", ")
            )?;
        }
        writeln!(f, "└───────────────────────────────────────────────────────────")?;

        Ok(())
    }
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a percentage, handling zero denominators.
fn fmt_percent(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", (numerator as f64 / denominator as f64) * 100.0)
    }
}

/// Render a horizontal bar using Unicode block characters.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = ((count * width) / max_count).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}
