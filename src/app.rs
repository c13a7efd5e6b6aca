//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging and environment configuration
//! - parses CLI arguments
//! - dispatches to the report pipeline, the dashboard, or the generator

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, DashArgs, DatasetArgs, GenArgs, ReportArgs};
use crate::domain::RunConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `pulse` binary.
pub fn run() -> Result<(), AppError> {
    // .env is optional; absence is not an error.
    let _ = dotenvy::dotenv();
    init_logging();

    // We want `pulse` and `pulse -d data.csv` to behave like `pulse dash ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Dash(args) => handle_dash(args),
        Command::Gen(args) => handle_gen(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Stderr keeps logs out of the terminal UI and of piped report output.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = run_config(&args.dataset, args.force);
    match pipeline::run_report(&config)? {
        pipeline::ReportRun::UpToDate => {
            println!(
                "Report in '{}' is up to date (run with --force to regenerate).",
                config.report_dir.display()
            );
        }
        pipeline::ReportRun::Generated(dataset) => {
            print!("{}", crate::insights::compose_insights(&dataset.table, &dataset.kpis));
            println!("\nArtifacts written to '{}'.", config.report_dir.display());
        }
    }
    Ok(())
}

fn handle_dash(args: DashArgs) -> Result<(), AppError> {
    let config = run_config(&args.dataset, false);
    crate::tui::run(config)
}

fn handle_gen(args: GenArgs) -> Result<(), AppError> {
    crate::data::write_dataset(&args.out, args.rows, args.seed)?;
    println!("Wrote {} rows to '{}'.", args.rows, args.out.display());
    Ok(())
}

/// Resolve flags, environment variables, and defaults into a `RunConfig`.
pub fn run_config(args: &DatasetArgs, force: bool) -> RunConfig {
    let dataset_path = args
        .data
        .clone()
        .or_else(|| std::env::var("PULSE_DATASET").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("dataset/dataset.csv"));
    let report_dir = args
        .report_dir
        .clone()
        .or_else(|| std::env::var("PULSE_REPORT_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("report"));
    RunConfig { dataset_path, report_dir, force }
}

/// Rewrite argv so `pulse` defaults to `pulse dash`.
///
/// Rules:
/// - `pulse`                      -> `pulse dash`
/// - `pulse -d data.csv ...`      -> `pulse dash -d data.csv ...`
/// - `pulse --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("dash".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "dash" | "gen");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "dash flags".
    if arg1.starts_with('-') {
        argv.insert(1, "dash".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_dash() {
        assert_eq!(rewrite_args(args(&["pulse"])), args(&["pulse", "dash"]));
    }

    #[test]
    fn leading_flag_is_treated_as_dash_flags() {
        assert_eq!(
            rewrite_args(args(&["pulse", "-d", "x.csv"])),
            args(&["pulse", "dash", "-d", "x.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["pulse", "report", "--force"])),
            args(&["pulse", "report", "--force"])
        );
        assert_eq!(rewrite_args(args(&["pulse", "--help"])), args(&["pulse", "--help"]));
    }
}
