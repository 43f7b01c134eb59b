//! Shared "report pipeline" logic.
//!
//! Meter lookup -> consumption fetch -> grid intensity + generation fetch ->
//! daily aggregation. The `report` command only adds printing and exports.

use tracing::info;

use crate::aggregate::summarize_days;
use crate::data::{CarbonIntensityClient, Meter, OpenVoltClient};
use crate::domain::{DailyReport, DateWindow, IntervalSeries, ProviderInterval, ReportConfig};
use crate::error::AppError;

/// All computed outputs of a single `footprint report` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub meter: Meter,
    pub window: DateWindow,
    /// Range the consumption provider reported; absent for pre-fetched series.
    pub interval: Option<ProviderInterval>,
    pub report: DailyReport,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_report(config: &ReportConfig) -> Result<RunOutput, AppError> {
    let openvolt = OpenVoltClient::from_env()?;
    let grid = CarbonIntensityClient::from_env()?;

    let meter = openvolt.fetch_meter(&config.meter_id)?;
    info!(meter = %meter.meter_number, customer = %meter.customer_name, "resolved meter");

    let consumption = openvolt.fetch_consumption(&meter, config.granularity, &config.window)?;
    let intensity = grid.fetch_intensity(&config.window)?;
    let generation = grid.fetch_generation(&config.window)?;

    let series = IntervalSeries {
        consumption: consumption.samples,
        intensity,
        generation,
    };
    let mut run = run_report_with_series(config, meter, &series)?;
    run.interval = Some(consumption.interval);
    Ok(run)
}

/// Aggregate pre-fetched series.
pub fn run_report_with_series(
    config: &ReportConfig,
    meter: Meter,
    series: &IntervalSeries,
) -> Result<RunOutput, AppError> {
    info!(
        consumption = series.consumption.len(),
        intensity = series.intensity.len(),
        generation = series.generation.len(),
        "aggregating interval series"
    );
    let report = summarize_days(series)?;

    Ok(RunOutput {
        meter,
        window: config.window,
        interval: None,
        report,
    })
}
