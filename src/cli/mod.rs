//! Command-line parsing for the sales analytics pipeline.
//!
//! Argument parsing and command dispatch stay separate from the analytics
//! code; this module only defines the surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pulse", version, about = "Sales analytics pipeline and dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate the report artifacts (charts + insights) if they are stale.
    Report(ReportArgs),
    /// Launch the interactive dashboard.
    ///
    /// Runs the same gated report pipeline as `pulse report` first, then
    /// opens a terminal UI over the cleaned dataset.
    Dash(DashArgs),
    /// Write a synthetic sample dataset.
    Gen(GenArgs),
}

/// Dataset and report-directory options shared by every command that reads
/// the dataset.
#[derive(Debug, Args, Clone)]
pub struct DatasetArgs {
    /// Path to the source CSV (default: dataset/dataset.csv, or PULSE_DATASET).
    #[arg(short = 'd', long = "data", value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Directory for generated artifacts (default: report, or PULSE_REPORT_DIR).
    #[arg(long = "report-dir", value_name = "DIR")]
    pub report_dir: Option<PathBuf>,
}

/// Options for `pulse report`.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Regenerate artifacts even when they are up to date.
    #[arg(short = 'f', long)]
    pub force: bool,
}

/// Options for `pulse dash`.
#[derive(Debug, Parser)]
pub struct DashArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
}

/// Options for `pulse gen`.
#[derive(Debug, Parser)]
pub struct GenArgs {
    /// Output path for the generated CSV.
    #[arg(short = 'o', long, default_value = "dataset/dataset.csv")]
    pub out: PathBuf,

    /// Number of rows to generate.
    #[arg(short = 'n', long = "rows", default_value_t = 5000)]
    pub rows: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
