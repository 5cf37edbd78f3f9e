//! Integration tests for the panorama CSV format.
//!
//! These exercise the reader and writer through real files, including the
//! atomic replace on save.

use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use panomark::ir::io_pano_csv::{
    from_pano_csv_str, read_pano_csv, to_pano_csv_string, write_pano_csv,
};
use panomark::ir::{Document, Header, Record};
use panomark::PanomarkError;

fn sample_document() -> Document {
    let header = Header::new(
        42,
        NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid date"),
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("valid time"),
    )
    .with_comment("first")
    .with_comment("  indented; with separator")
    .with_comment("first");

    Document::new(
        header,
        vec![
            Record::new(0, 0, 100, 100),
            Record::new(100, 100, 200, 200).with_offset(90.0, 0.0),
            Record::new(3700, 10, 3800, 20).with_offset(-12.25, 3.5),
            Record::new(10, 400, 3839, 511).with_offset(359.99, -0.01),
        ],
    )
}

/// Test that the fixture file loads with every field intact.
#[test]
fn read_valid_fixture() {
    let path = Path::new("tests/fixtures/sample_valid.pano.csv");
    let document = read_pano_csv(path).expect("Failed to read fixture");

    assert_eq!(
        document.header.comments,
        vec!["Survey 12, north mast", "operator;alice"]
    );
    assert_eq!(document.header.machine_number, 12);
    assert_eq!(document.header.version, 1);
    assert_eq!(document.records.len(), 3);
    assert_eq!(document.records[2].azimuth, 11.25);
}

#[test]
fn file_roundtrip_preserves_document() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let path = temp.path().join("roundtrip.pano.csv");

    let original = sample_document();
    write_pano_csv(&path, &original).expect("write failed");
    let restored = read_pano_csv(&path).expect("read failed");

    assert_eq!(restored, original);
}

#[test]
fn string_roundtrip_is_stable() {
    let original = sample_document();
    let first = to_pano_csv_string(&original).expect("serialize first pass");
    let second = to_pano_csv_string(&from_pano_csv_str(&first).expect("parse first pass"))
        .expect("serialize second pass");
    assert_eq!(first, second);
}

#[test]
fn angles_are_rounded_to_two_decimals() {
    let document = Document::new(
        Header::default(),
        vec![Record::new(0, 0, 10, 10).with_offset(12.3456, -0.004)],
    );
    let text = to_pano_csv_string(&document).expect("serialize");
    assert!(text.ends_with("0;0;10;10;12.35;-0.00\n"), "{text}");

    let restored = from_pano_csv_str(&text).expect("parse");
    assert_eq!(restored.records[0].azimuth, 12.35);
    assert_eq!(restored.records[0].elevation, 0.0);
}

#[test]
fn writing_replaces_existing_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let path = temp.path().join("marks.pano.csv");
    std::fs::write(&path, "stale\n").expect("seed file");

    write_pano_csv(&path, &sample_document()).expect("write failed");
    let text = std::fs::read_to_string(&path).expect("read back");
    assert!(text.starts_with("text;first\n"));

    // Only the destination is left behind.
    let entries = std::fs::read_dir(temp.path()).expect("list dir").count();
    assert_eq!(entries, 1);
}

#[test]
fn failed_save_keeps_previous_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let path = temp.path().join("marks.pano.csv");
    write_pano_csv(&path, &sample_document()).expect("first write");
    let before = std::fs::read_to_string(&path).expect("read back");

    let mut broken = sample_document();
    broken.records.push(Record::new(5, 5, 5, 50));
    let err = write_pano_csv(&path, &broken).unwrap_err();
    assert!(matches!(err, PanomarkError::InvalidRecord { row: 5, .. }));

    assert_eq!(std::fs::read_to_string(&path).expect("read back"), before);
    let entries = std::fs::read_dir(temp.path()).expect("list dir").count();
    assert_eq!(entries, 1);
}

#[test]
fn load_error_fixtures() {
    let cases = [
        ("tests/fixtures/sample_bad_count.pano.csv", 3),
        ("tests/fixtures/sample_bad_version.pano.csv", 2),
        ("tests/fixtures/sample_out_of_range.pano.csv", 5),
    ];
    for (path, line) in cases {
        let err = read_pano_csv(Path::new(path)).unwrap_err();
        assert_eq!(err.line(), Some(line), "{path}: {err}");
    }
}

#[test]
fn degenerate_fixture_loads_but_cannot_be_saved() {
    let document = read_pano_csv(Path::new("tests/fixtures/sample_degenerate.pano.csv"))
        .expect("degenerate boxes are legal on load");
    assert_eq!(document.records.len(), 3);

    let err = to_pano_csv_string(&document).unwrap_err();
    assert!(matches!(err, PanomarkError::InvalidRecord { row: 2, .. }));
}
