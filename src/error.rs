use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// The main error type for panomark operations.
#[derive(Debug, Error)]
pub enum PanomarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{path}: line {line}: invalid {field}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        field: String,
        message: String,
    },

    #[error("{path}: line {line}: missing required '{section}' section")]
    MissingSection {
        path: PathBuf,
        line: usize,
        section: &'static str,
    },

    #[error("{path}: line {line}: duplicate '{section}' section (first seen on line {first_line})")]
    DuplicateSection {
        path: PathBuf,
        line: usize,
        section: &'static str,
        first_line: usize,
    },

    #[error("{path}: line {line}: count mismatch: declared {declared}, found {actual} data row(s)")]
    CountMismatch {
        path: PathBuf,
        line: usize,
        declared: usize,
        actual: usize,
    },

    #[error("{path}: line {line}: unsupported protocol version {version} (only version 1 is supported)")]
    UnsupportedVersion {
        path: PathBuf,
        line: usize,
        version: i32,
    },

    #[error("Invalid record at row {row} while writing {path}: {message}")]
    InvalidRecord {
        path: PathBuf,
        row: usize,
        message: String,
    },

    #[error("Comment {index} contains a line break and cannot be written to {path}")]
    InvalidComment {
        path: PathBuf,
        index: usize,
    },

    #[error("Failed to write {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to serialize report: {0}")]
    ReportJson(#[from] serde_json::Error),

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },
}

impl PanomarkError {
    /// The 1-based source line a load error points at, if it is a load error.
    pub fn line(&self) -> Option<usize> {
        match self {
            PanomarkError::Parse { line, .. }
            | PanomarkError::MissingSection { line, .. }
            | PanomarkError::DuplicateSection { line, .. }
            | PanomarkError::CountMismatch { line, .. }
            | PanomarkError::UnsupportedVersion { line, .. } => Some(*line),
            _ => None,
        }
    }
}
