//! Command-line parsing for the daily footprint report.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from fetching and aggregation.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::Granularity;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "footprint",
    version,
    about = "Daily electricity consumption and carbon footprint (OpenVolt + GB grid data)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch meter and grid data, aggregate per day, print and optionally export.
    Report(ReportArgs),
    /// Print a previously exported report JSON.
    Show(ShowArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// OpenVolt meter id.
    #[arg(long, env = "OPENVOLT_METER_ID")]
    pub meter_id: String,

    /// First day of the window (inclusive, UTC).
    #[arg(long, default_value = "2023-01-01")]
    pub start: NaiveDate,

    /// Day after the last day of the window (exclusive, UTC).
    #[arg(long, default_value = "2023-02-01")]
    pub end: NaiveDate,

    /// Interval size requested from OpenVolt.
    ///
    /// Grid data is half-hourly, so anything other than `hh` fails the
    /// interval-count check.
    #[arg(long, value_enum, default_value_t = Granularity::Hh)]
    pub granularity: Granularity,

    /// Export per-day results to CSV.
    #[arg(long = "export-csv")]
    pub export_csv: Option<PathBuf>,

    /// Export the report to JSON (reloadable with `footprint show`).
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for printing a saved report.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Report JSON file produced by `footprint report --export-json`.
    #[arg(long, value_name = "JSON")]
    pub json: PathBuf,
}
