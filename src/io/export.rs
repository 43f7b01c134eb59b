//! Export daily reports to CSV and JSON, and reload JSON exports.
//!
//! The CSV is meant to be easy to consume in spreadsheets: one row per day,
//! raw units (kWh, grams) and one column per fuel.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::domain::{DailyReport, FuelType, ReportFile};
use crate::error::AppError;

/// Write one CSV row per day.
pub fn write_report_csv(path: &Path, report: &DailyReport) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let fuel_columns: Vec<&str> = FuelType::ALL.iter().map(|f| f.as_str()).collect();
    writeln!(file, "date,consumption_kwh,carbon_g,{}", fuel_columns.join(","))
        .map_err(|e| AppError::config(format!("Failed to write export CSV header: {e}")))?;

    for (date, day) in report {
        let fuels: Vec<String> = day
            .generation_mix_average
            .iter()
            .map(|(_, perc)| format!("{perc:.4}"))
            .collect();
        writeln!(
            file,
            "{date},{:.4},{:.4},{}",
            day.consumption_total,
            day.carbon_mass_total,
            fuels.join(",")
        )
        .map_err(|e| AppError::config(format!("Failed to write export CSV row: {e}")))?;
    }

    info!(path = %path.display(), rows = report.len(), "wrote CSV export");
    Ok(())
}

/// Write a report JSON file.
pub fn write_report_json(path: &Path, file: &ReportFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create report JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::config(format!("Failed to write report JSON: {e}")))?;

    info!(path = %path.display(), days = file.days.len(), "wrote JSON export");
    Ok(())
}

/// Read a report JSON file.
pub fn read_report_json(path: &Path) -> Result<ReportFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::config(format!("Failed to open report JSON '{}': {e}", path.display())))?;
    let report: ReportFile =
        serde_json::from_reader(file).map_err(|e| AppError::config(format!("Invalid report JSON: {e}")))?;
    Ok(report)
}
