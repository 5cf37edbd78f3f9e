//! Panorama annotation CSV reader and writer.
//!
//! The format is line oriented and `;`-delimited. The first field of each
//! line is a case-insensitive key:
//!
//! ```text
//! text;<comment>                      any number, stored verbatim
//! header;<machine>;<dd.MM.yyyy>;<HH:mm:ss.mmm>
//! version;<int>                       only 1 is accepted
//! count;<non-negative int>            must equal the number of data rows
//! data                                everything after this is a data row
//! x1;y1;x2;y2;azimuth;elevation
//! ```
//!
//! Lines may end in LF, CRLF or a bare CR.
//!
//! `header`, `version` and `count` must each appear exactly once. Coordinates
//! are strict integers; angles accept either `.` or `,` as decimal separator.
//! Reversed corner pairs are swapped, then every box must fit in
//! `[0,3840)x[0,512)`.
//!
//! # Errors
//!
//! Reading is fail-fast: the first problem aborts the load and the error
//! carries the 1-based line number plus the offending field. There is no
//! partial recovery.
//!
//! # Writing
//!
//! Every record passes through [`check_record`](crate::validation::check_record)
//! before it is written, and angles must be finite; the first refusal aborts
//! the save. Comments holding a line break are refused too, since they would
//! not read back as one comment. Output is built in
//! memory and [`write_pano_csv`] replaces the destination atomically, so a
//! refused save leaves any existing file untouched.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveTime};
use tracing::{debug, info, warn};

use super::model::{Document, Header, Record, PANORAMA_HEIGHT, PANORAMA_WIDTH, SUPPORTED_VERSION};
use crate::error::PanomarkError;
use crate::validation::{check_record, PanoramaBounds};

const DATE_FORMAT: &str = "%d.%m.%Y";
const TIME_FORMAT: &str = "%H:%M:%S%.3f";
const DATA_FIELDS: usize = 6;

// ============================================================================
// Public API
// ============================================================================

/// Reads a document from a panorama CSV file.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use panomark::ir::io_pano_csv::read_pano_csv;
///
/// let document = read_pano_csv(Path::new("marks.csv"))?;
/// # Ok::<(), panomark::PanomarkError>(())
/// ```
pub fn read_pano_csv(path: &Path) -> Result<Document, PanomarkError> {
    debug!(path = %path.display(), "loading panorama csv");
    let file = File::open(path).map_err(PanomarkError::Io)?;
    let document = parse_document(BufReader::new(file), path)?;
    info!(
        path = %path.display(),
        rows = document.records.len(),
        "panorama csv loaded"
    );
    Ok(document)
}

/// Writes a document to a panorama CSV file.
///
/// The file is written to a temporary sibling and renamed over `path` only
/// after every record has passed the strict validator.
pub fn write_pano_csv(path: &Path, document: &Document) -> Result<(), PanomarkError> {
    debug!(
        path = %path.display(),
        rows = document.records.len(),
        "saving panorama csv"
    );
    let bytes = render_document(document, path)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(PanomarkError::Io)?;
    staged.write_all(&bytes).map_err(PanomarkError::Io)?;
    staged.as_file().sync_all().map_err(PanomarkError::Io)?;
    staged
        .persist(path)
        .map_err(|e| PanomarkError::Io(e.error))?;

    info!(path = %path.display(), "panorama csv saved");
    Ok(())
}

/// Reads a document from a string.
///
/// Useful for testing without file I/O.
pub fn from_pano_csv_str(text: &str) -> Result<Document, PanomarkError> {
    from_pano_csv_slice(text.as_bytes())
}

/// Reads a document from raw bytes.
///
/// Useful for fuzzing; invalid UTF-8 is reported as a parse error.
pub fn from_pano_csv_slice(bytes: &[u8]) -> Result<Document, PanomarkError> {
    parse_document(bytes, Path::new("<bytes>"))
}

/// Writes a document to a string.
///
/// Useful for testing without file I/O.
pub fn to_pano_csv_string(document: &Document) -> Result<String, PanomarkError> {
    let dummy_path = Path::new("<string>");
    let bytes = render_document(document, dummy_path)?;
    String::from_utf8(bytes).map_err(|e| PanomarkError::Parse {
        path: dummy_path.to_path_buf(),
        line: 0,
        field: "output".to_string(),
        message: format!("invalid UTF-8 in output: {}", e),
    })
}

// ============================================================================
// Reading
// ============================================================================

/// Where a required section was first seen, plus what it held.
#[derive(Clone, Copy)]
struct Seen<T> {
    line: usize,
    value: T,
}

#[derive(Default)]
struct SectionState {
    header: Option<usize>,
    version: Option<Seen<i32>>,
    count: Option<Seen<usize>>,
    in_data: bool,
}

fn parse_document<R: Read>(mut input: R, path: &Path) -> Result<Document, PanomarkError> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes).map_err(PanomarkError::Io)?;
    let bytes = normalize_line_breaks(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(bytes.as_ref());

    let mut document = Document::default();
    let mut state = SectionState::default();
    let mut last_line = 1;
    let mut raw = csv::StringRecord::new();

    loop {
        let more = reader.read_record(&mut raw).map_err(|e| PanomarkError::Parse {
            path: path.to_path_buf(),
            line: e
                .position()
                .map(|pos| pos.line() as usize)
                .unwrap_or(last_line),
            field: "line".to_string(),
            message: e.to_string(),
        })?;
        if !more {
            break;
        }

        let line_num = raw
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(last_line);

        // Rejoin and trim the whole line so comments keep their inner
        // whitespace and `;` characters.
        let joined = raw.iter().collect::<Vec<_>>().join(";");
        let line = joined.trim().trim_start_matches('\u{feff}');
        if line.is_empty() {
            continue;
        }
        last_line = line_num;
        let parts: Vec<&str> = line.split(';').collect();

        if state.in_data {
            let record = parse_data_row(&parts, path, line_num)?;
            debug!(
                line = line_num,
                x1 = record.x1,
                y1 = record.y1,
                x2 = record.x2,
                y2 = record.y2,
                azimuth = record.azimuth,
                elevation = record.elevation,
                "data row added"
            );
            document.records.push(record);
            continue;
        }

        let key = parts[0].trim().to_ascii_lowercase();
        match key.as_str() {
            "text" => {
                document.header.comments.push(parts[1..].join(";"));
            }
            "header" => {
                check_duplicate(state.header, "header", path, line_num)?;
                parse_header_line(&parts, &mut document.header, path, line_num)?;
                state.header = Some(line_num);
                debug!(
                    line = line_num,
                    machine = document.header.machine_number,
                    "header parsed"
                );
            }
            "version" => {
                check_duplicate(state.version.map(|s| s.line), "version", path, line_num)?;
                let raw_version = section_value(&parts, "version", path, line_num)?;
                let version = parse_int_field(raw_version, "version", path, line_num)?;
                document.header.version = version;
                state.version = Some(Seen {
                    line: line_num,
                    value: version,
                });
                debug!(line = line_num, version, "version parsed");
            }
            "count" => {
                check_duplicate(state.count.map(|s| s.line), "count", path, line_num)?;
                let raw_count = section_value(&parts, "count", path, line_num)?;
                let declared = raw_count.trim().parse::<usize>().map_err(|_| {
                    parse_error(
                        path,
                        line_num,
                        "count",
                        format!("expected non-negative integer, found '{}'", raw_count),
                    )
                })?;
                state.count = Some(Seen {
                    line: line_num,
                    value: declared,
                });
                debug!(line = line_num, declared, "count parsed");
            }
            "data" => {
                state.in_data = true;
                debug!(line = line_num, "data section starts");
            }
            other => {
                warn!(line = line_num, key = other, "ignoring unknown line");
            }
        }
    }

    if state.header.is_none() {
        return Err(missing(path, last_line, "header"));
    }
    let Some(version) = state.version else {
        return Err(missing(path, last_line, "version"));
    };
    let Some(count) = state.count else {
        return Err(missing(path, last_line, "count"));
    };

    if count.value != document.records.len() {
        return Err(PanomarkError::CountMismatch {
            path: path.to_path_buf(),
            line: count.line,
            declared: count.value,
            actual: document.records.len(),
        });
    }

    if version.value != SUPPORTED_VERSION {
        return Err(PanomarkError::UnsupportedVersion {
            path: path.to_path_buf(),
            line: version.line,
            version: version.value,
        });
    }

    Ok(document)
}

/// Rewrites bare CR line breaks as LF. The csv reader splits on a lone CR
/// but only counts LF when reporting line numbers.
fn normalize_line_breaks(bytes: &[u8]) -> Cow<'_, [u8]> {
    if !bytes.contains(&b'\r') {
        return Cow::Borrowed(bytes);
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied().peekable();
    while let Some(b) = iter.next() {
        if b != b'\r' {
            out.push(b);
        } else if iter.peek() != Some(&b'\n') {
            out.push(b'\n');
        }
    }
    Cow::Owned(out)
}

fn parse_header_line(
    parts: &[&str],
    header: &mut Header,
    path: &Path,
    line_num: usize,
) -> Result<(), PanomarkError> {
    if parts.len() < 4 {
        return Err(parse_error(
            path,
            line_num,
            "header",
            format!("expected 4 fields, found {}", parts.len()),
        ));
    }

    header.machine_number = parse_int_field(parts[1], "machine_number", path, line_num)?;

    let date = NaiveDate::parse_from_str(parts[2].trim(), DATE_FORMAT).map_err(|_| {
        parse_error(
            path,
            line_num,
            "date",
            format!("expected dd.MM.yyyy, found '{}'", parts[2]),
        )
    })?;
    let time = NaiveTime::parse_from_str(parts[3].trim(), TIME_FORMAT).map_err(|_| {
        parse_error(
            path,
            line_num,
            "time",
            format!("expected HH:mm:ss.mmm, found '{}'", parts[3]),
        )
    })?;

    header.date = Some(date);
    header.time = Some(time);
    Ok(())
}

fn parse_data_row(parts: &[&str], path: &Path, line_num: usize) -> Result<Record, PanomarkError> {
    if parts.len() < DATA_FIELDS {
        return Err(parse_error(
            path,
            line_num,
            "row",
            format!("expected {} fields, found {}", DATA_FIELDS, parts.len()),
        ));
    }

    let mut record = Record {
        x1: parse_int_field(parts[0], "x1", path, line_num)?,
        y1: parse_int_field(parts[1], "y1", path, line_num)?,
        x2: parse_int_field(parts[2], "x2", path, line_num)?,
        y2: parse_int_field(parts[3], "y2", path, line_num)?,
        azimuth: parse_angle_field(parts[4], "azimuth", path, line_num)?,
        elevation: parse_angle_field(parts[5], "elevation", path, line_num)?,
    };

    record.sort_corners();

    if record.x1 < 0 || record.x2 >= PANORAMA_WIDTH || record.y1 < 0 || record.y2 >= PANORAMA_HEIGHT
    {
        return Err(parse_error(
            path,
            line_num,
            "coordinates",
            format!(
                "({}, {}, {}, {}) outside [0,{})x[0,{})",
                record.x1, record.y1, record.x2, record.y2, PANORAMA_WIDTH, PANORAMA_HEIGHT
            ),
        ));
    }

    Ok(record)
}

/// Fuzz-only entrypoint for single data-row parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_data_row(line: &str) -> Result<(), PanomarkError> {
    let parts: Vec<&str> = line.trim().split(';').collect();
    let _ = parse_data_row(&parts, Path::new("<fuzz>"), 1)?;
    Ok(())
}

fn section_value<'a>(
    parts: &[&'a str],
    section: &str,
    path: &Path,
    line_num: usize,
) -> Result<&'a str, PanomarkError> {
    parts.get(1).copied().ok_or_else(|| {
        parse_error(
            path,
            line_num,
            section,
            format!("expected 2 fields, found {}", parts.len()),
        )
    })
}

fn parse_int_field(
    raw: &str,
    field_name: &str,
    path: &Path,
    line_num: usize,
) -> Result<i32, PanomarkError> {
    raw.trim().parse::<i32>().map_err(|_| {
        parse_error(
            path,
            line_num,
            field_name,
            format!("expected integer, found '{}'", raw),
        )
    })
}

fn parse_angle_field(
    raw: &str,
    field_name: &str,
    path: &Path,
    line_num: usize,
) -> Result<f64, PanomarkError> {
    let value = raw
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite());
    value.ok_or_else(|| {
        parse_error(
            path,
            line_num,
            field_name,
            format!("expected number, found '{}'", raw),
        )
    })
}

fn check_duplicate(
    first_line: Option<usize>,
    section: &'static str,
    path: &Path,
    line_num: usize,
) -> Result<(), PanomarkError> {
    match first_line {
        Some(first_line) => Err(PanomarkError::DuplicateSection {
            path: path.to_path_buf(),
            line: line_num,
            section,
            first_line,
        }),
        None => Ok(()),
    }
}

fn parse_error(
    path: &Path,
    line: usize,
    field: &str,
    message: impl Into<String>,
) -> PanomarkError {
    PanomarkError::Parse {
        path: path.to_path_buf(),
        line,
        field: field.to_string(),
        message: message.into(),
    }
}

fn missing(path: &Path, line: usize, section: &'static str) -> PanomarkError {
    PanomarkError::MissingSection {
        path: path.to_path_buf(),
        line,
        section,
    }
}

// ============================================================================
// Writing
// ============================================================================

fn render_document(document: &Document, path: &Path) -> Result<Vec<u8>, PanomarkError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    let csv_err = |source| PanomarkError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    for (idx, comment) in document.header.comments.iter().enumerate() {
        if comment.contains(['\n', '\r']) {
            return Err(PanomarkError::InvalidComment {
                path: path.to_path_buf(),
                index: idx + 1,
            });
        }
        writer
            .write_record(["text", comment.as_str()])
            .map_err(csv_err)?;
    }

    let now = Local::now();
    let date = document.header.date.unwrap_or_else(|| now.date_naive());
    let time = document.header.time.unwrap_or_else(|| now.time());
    writer
        .write_record([
            "header".to_string(),
            document.header.machine_number.to_string(),
            date.format(DATE_FORMAT).to_string(),
            time.format(TIME_FORMAT).to_string(),
        ])
        .map_err(csv_err)?;
    writer
        .write_record(["version".to_string(), document.header.version.to_string()])
        .map_err(csv_err)?;
    writer
        .write_record(["count".to_string(), document.records.len().to_string()])
        .map_err(csv_err)?;
    writer.write_record(["data"]).map_err(csv_err)?;

    for (idx, record) in document.records.iter().enumerate() {
        check_record(record, PanoramaBounds::default()).map_err(|problem| {
            PanomarkError::InvalidRecord {
                path: PathBuf::from(path),
                row: idx + 1,
                message: problem.to_string(),
            }
        })?;
        if !record.azimuth.is_finite() || !record.elevation.is_finite() {
            return Err(PanomarkError::InvalidRecord {
                path: PathBuf::from(path),
                row: idx + 1,
                message: "azimuth and elevation must be finite".to_string(),
            });
        }
        writer
            .write_record([
                record.x1.to_string(),
                record.y1.to_string(),
                record.x2.to_string(),
                record.y2.to_string(),
                format!("{:.2}", record.azimuth),
                format!("{:.2}", record.elevation),
            ])
            .map_err(csv_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| PanomarkError::Io(e.into_error()))
}

// ============================================================================
// Tests
// ============================================================================
