//! Panomark: annotation tooling for 360° panoramas.
//!
//! Panomark reads and writes the `;`-delimited panorama annotation format,
//! checks records against the 3840x512 panorama, projects them through their
//! azimuth/elevation offset onto the visible band, and finds overlapping
//! rows.
//!
//! # Modules
//!
//! - [`ir`]: Document model, shape classifier and the file format reader/writer
//! - [`validation`]: Strict record validator, validation reports, auto-fix
//! - [`projection`]: Offset, wraparound, seam splitting and band clipping
//! - [`intersection`]: All-pairs overlap detection
//! - [`scene`]: Analysis pipeline and selection sync for editing/rendering surfaces
//! - [`inspect`]: Document statistics
//! - [`error`]: Error types for panomark operations

pub mod error;
pub mod inspect;
pub mod intersection;
pub mod ir;
pub mod projection;
pub mod scene;
pub mod validation;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::info;

pub use error::PanomarkError;

/// The panomark CLI application.
#[derive(Parser)]
#[command(name = "panomark")]
#[command(version, author, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log filter for diagnostics on stderr (e.g. 'debug', 'panomark=trace').
    #[arg(long, global = true, env = "PANOMARK_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate an annotation file.
    Validate(ValidateArgs),
    /// Auto-fix coordinates and save the result.
    Fix(FixArgs),
    /// Show projected segments and overlaps.
    Project(ProjectArgs),
    /// Show header fields and statistics.
    Inspect(InspectArgs),
}

/// Report format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Input file to validate.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any rows overlap).
    #[arg(long)]
    strict: bool,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

/// Arguments for the fix subcommand.
#[derive(clap::Args)]
struct FixArgs {
    /// Input file.
    input: PathBuf,

    /// Where to write the fixed file (may equal the input).
    #[arg(short, long)]
    output: PathBuf,
}

/// Arguments for the project subcommand.
#[derive(clap::Args)]
struct ProjectArgs {
    /// Input file.
    input: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Input file.
    input: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

/// Run the panomark CLI with already-parsed arguments.
///
/// This is the main entry point for the CLI, called from `main.rs` once the
/// log subscriber is installed.
pub fn run(cli: Cli) -> Result<(), PanomarkError> {
    match cli.command {
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Fix(args)) => run_fix(args),
        Some(Commands::Project(args)) => run_project(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            println!("panomark {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Annotation tooling for 360° panoramas.");
            println!();
            println!("Run 'panomark --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), PanomarkError> {
    let document = ir::io_pano_csv::read_pano_csv(&args.input)?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
        ..Default::default()
    };
    let report = validation::validate_document(&document, &opts);

    match args.output {
        OutputFormat::Json => {
            let value = json!({
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "issues": report.issues,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => print!("{}", report),
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (opts.strict && has_warnings) {
        Err(PanomarkError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the fix subcommand.
fn run_fix(args: FixArgs) -> Result<(), PanomarkError> {
    let mut document = ir::io_pano_csv::read_pano_csv(&args.input)?;
    let summary = validation::auto_fix_document(&mut document);
    info!(rows_changed = summary.rows_changed, "auto-fix finished");

    ir::io_pano_csv::write_pano_csv(&args.output, &document)?;

    println!(
        "Fixed {} of {} row(s): {} -> {}",
        summary.rows_changed,
        document.records.len(),
        args.input.display(),
        args.output.display()
    );
    Ok(())
}

/// Execute the project subcommand.
fn run_project(args: ProjectArgs) -> Result<(), PanomarkError> {
    let document = ir::io_pano_csv::read_pano_csv(&args.input)?;
    let analysis = scene::analyze(&document.records);

    match args.output {
        OutputFormat::Json => {
            let value = json!({
                "segments": analysis.segments,
                "conflicting_rows": analysis.conflicts.conflicting_rows,
                "overlaps": analysis.conflicts.overlaps,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            for (row, _) in document.rows() {
                let shape = analysis
                    .shape(row)
                    .map(|s| s.as_str())
                    .unwrap_or("unknown");
                let marker = if analysis.is_conflicting(row) { " *" } else { "" };
                println!("row {} ({}){}", row, shape, marker);
                let mut visible = false;
                for (_, segment) in analysis.segments_for_row(row) {
                    visible = true;
                    println!(
                        "  ({:.2}, {:.2}, {:.2}, {:.2})",
                        segment.rect.xmin(),
                        segment.rect.ymin(),
                        segment.rect.xmax(),
                        segment.rect.ymax()
                    );
                }
                if !visible {
                    println!("  not visible");
                }
            }
            println!();
            print!("{}", analysis.conflicts);
        }
    }

    Ok(())
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), PanomarkError> {
    let document = ir::io_pano_csv::read_pano_csv(&args.input)?;
    let report = inspect::inspect_document(&document, &inspect::InspectOptions::default());

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", report),
    }

    Ok(())
}
