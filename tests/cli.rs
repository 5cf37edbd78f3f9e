use assert_cmd::Command;
use predicates::prelude::*;

fn panomark() -> Command {
    let mut cmd = Command::cargo_bin("panomark").unwrap();
    cmd.env_remove("PANOMARK_LOG");
    cmd
}

#[test]
fn runs() {
    panomark().assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = panomark();
    cmd.arg("-V");
    cmd.assert().success().stdout("panomark 0.1.0\n");
}

// Validate subcommand tests

#[test]
fn validate_valid_file_succeeds() {
    let mut cmd = panomark();
    cmd.args(["validate", "tests/fixtures/sample_valid.pano.csv"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Validation passed"));
}

#[test]
fn validate_overlap_is_a_warning() {
    let mut cmd = panomark();
    cmd.args(["validate", "tests/fixtures/sample_overlap.pano.csv"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("RowsOverlap"))
        .stdout(predicate::str::contains("rows 1 and 2"));
}

#[test]
fn validate_strict_fails_on_overlap() {
    let mut cmd = panomark();
    cmd.args([
        "validate",
        "tests/fixtures/sample_overlap.pano.csv",
        "--strict",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("1 warning(s)"));
}

#[test]
fn validate_degenerate_rows_fail() {
    let mut cmd = panomark();
    cmd.args(["validate", "tests/fixtures/sample_degenerate.pano.csv"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("EmptyExtent"))
        .stdout(predicate::str::contains("row 2"))
        .stdout(predicate::str::contains("row 3"));
}

#[test]
fn validate_json_output_format() {
    let mut cmd = panomark();
    cmd.args([
        "validate",
        "tests/fixtures/sample_overlap.pano.csv",
        "--output",
        "json",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(value["error_count"], 0);
    assert_eq!(value["warning_count"], 1);
    assert_eq!(value["issues"][0]["code"], "RowsOverlap");
    assert_eq!(value["issues"][0]["context"]["kind"], "row_pair");
    assert_eq!(value["issues"][0]["context"]["first"], 0);
}

#[test]
fn validate_rejects_unknown_output_format() {
    let mut cmd = panomark();
    cmd.args([
        "validate",
        "tests/fixtures/sample_valid.pano.csv",
        "--output",
        "yaml",
    ]);
    cmd.assert().failure();
}

// Load errors

#[test]
fn count_mismatch_is_reported_with_line() {
    let mut cmd = panomark();
    cmd.args(["validate", "tests/fixtures/sample_bad_count.pano.csv"]);
    cmd.assert().failure().stderr(
        predicate::str::contains("line 3").and(predicate::str::contains("count mismatch")),
    );
}

#[test]
fn unsupported_version_is_reported() {
    let mut cmd = panomark();
    cmd.args(["inspect", "tests/fixtures/sample_bad_version.pano.csv"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unsupported protocol version 2"));
}

#[test]
fn out_of_range_row_is_reported() {
    let mut cmd = panomark();
    cmd.args(["project", "tests/fixtures/sample_out_of_range.pano.csv"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("line 5: invalid coordinates"));
}

#[test]
fn missing_file_fails() {
    let mut cmd = panomark();
    cmd.args(["validate", "tests/fixtures/does_not_exist.pano.csv"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

// Project subcommand tests

#[test]
fn project_prints_split_segments() {
    let mut cmd = panomark();
    cmd.args(["project", "tests/fixtures/sample_valid.pano.csv"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(1060.00, 100.00, 1160.00, 200.00)"))
        .stdout(predicate::str::contains("(3820.00, 300.00, 3840.00, 360.00)"))
        .stdout(predicate::str::contains("(0.00, 300.00, 80.00, 360.00)"))
        .stdout(predicate::str::contains("No overlaps"));
}

#[test]
fn project_json_lists_overlaps() {
    let mut cmd = panomark();
    cmd.args([
        "project",
        "tests/fixtures/sample_overlap.pano.csv",
        "--output",
        "json",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(value["segments"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["conflicting_rows"], serde_json::json!([0, 1]));
    assert_eq!(value["overlaps"][0]["rect"]["xmin"], 50.0);
    assert_eq!(value["overlaps"][0]["rect"]["ymax"], 100.0);
}

// Inspect subcommand tests

#[test]
fn inspect_shows_header_and_shapes() {
    let mut cmd = panomark();
    cmd.args(["inspect", "tests/fixtures/sample_degenerate.pano.csv"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("01.01.2024"))
        .stdout(predicate::str::contains("Shapes (3)"))
        .stdout(predicate::str::contains("point"))
        .stdout(predicate::str::contains("Not savable"));
}

#[test]
fn inspect_json_keeps_comments() {
    let mut cmd = panomark();
    cmd.args([
        "inspect",
        "tests/fixtures/sample_valid.pano.csv",
        "--output",
        "json",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(
        value["header"]["comments"],
        serde_json::json!(["Survey 12, north mast", "operator;alice"])
    );
    assert_eq!(value["extents"]["seam_crossing"], 1);
}

// Fix subcommand tests

#[test]
fn fix_writes_a_loadable_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let out = temp.path().join("fixed.pano.csv");

    let mut cmd = panomark();
    cmd.args(["fix", "tests/fixtures/sample_valid.pano.csv", "-o"])
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Fixed 0 of 3 row(s)"));

    let written = std::fs::read_to_string(&out).expect("read output");
    assert!(written.starts_with("text;Survey 12, north mast\n"));
    assert!(written.contains("3700;300;3800;360;11.25;0.00\n"));
}

#[test]
fn fix_refuses_to_save_degenerate_rows() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let out = temp.path().join("fixed.pano.csv");

    let mut cmd = panomark();
    cmd.args(["fix", "tests/fixtures/sample_degenerate.pano.csv", "-o"])
        .arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid record at row 2"));
    assert!(!out.exists());
}

#[test]
fn debug_logging_goes_to_stderr() {
    let mut cmd = panomark();
    cmd.args([
        "--log-level",
        "debug",
        "validate",
        "tests/fixtures/sample_valid.pano.csv",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("data row added").not())
        .stderr(predicate::str::contains("data row added"));
}
