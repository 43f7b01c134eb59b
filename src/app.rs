//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - sets up logging
//! - parses CLI arguments
//! - fetches provider data and aggregates it per day
//! - prints the report
//! - writes optional exports

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ReportArgs, ShowArgs};
use crate::domain::{DateWindow, ReportConfig, ReportFile};
use crate::report::format_report;
use crate::error::AppError;

pub mod pipeline;

const TOOL_NAME: &str = "footprint";

/// Entry point for the `footprint` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();
    // Loaded before parsing so `OPENVOLT_METER_ID` in `.env` can fill `--meter-id`.
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Show(args) => handle_show(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Logs go to stderr; stdout carries only the report.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = report_config_from_args(&args)?;
    info!(
        meter_id = %config.meter_id,
        start = %config.window.start,
        end = %config.window.end,
        "loading data"
    );
    let run = pipeline::run_report(&config)?;
    let file = ReportFile {
        tool: TOOL_NAME.to_string(),
        meter_number: Some(run.meter.meter_number),
        window: run.window,
        interval: run.interval,
        days: run.report,
    };

    println!("{}", format_report(&file));

    if let Some(path) = &config.export_csv {
        crate::io::write_report_csv(path, &file.days)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::write_report_json(path, &file)?;
    }

    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let file = crate::io::read_report_json(&args.json)?;
    println!("{}", format_report(&file));
    Ok(())
}

pub fn report_config_from_args(args: &ReportArgs) -> Result<ReportConfig, AppError> {
    let meter_id = args.meter_id.trim();
    if meter_id.is_empty() {
        return Err(AppError::config("Meter id must not be empty."));
    }
    Ok(ReportConfig {
        meter_id: meter_id.to_string(),
        window: DateWindow::new(args.start, args.end)?,
        granularity: args.granularity,
        export_csv: args.export_csv.clone(),
        export_json: args.export_json.clone(),
    })
}

/// Rewrite argv so `footprint` defaults to `footprint report`.
///
/// Rules:
/// - `footprint`                       -> `footprint report`
/// - `footprint --start 2023-03-01 ..` -> `footprint report --start 2023-03-01 ..`
/// - `footprint --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if matches!(arg1.as_str(), "report" | "show") {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
        return argv;
    }

    argv
}
