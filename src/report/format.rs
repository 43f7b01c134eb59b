//! Formatted terminal output for daily reports.
//!
//! The core keeps raw units (kWh, grams); conversions for display (grams to
//! kg, two-decimal percentages) happen only here.

use crate::domain::{DailyReport, DaySummary, ReportFile};
use crate::report::compute_totals;

/// Format the full report: header, one block per day, then totals.
pub fn format_report(file: &ReportFile) -> String {
    let mut out = String::new();
    let window = &file.window;

    out.push_str("=== footprint - daily consumption & carbon ===\n");
    if let Some(meter) = &file.meter_number {
        out.push_str(&format!("Meter: {meter}\n"));
    }
    out.push_str(&format!(
        "Window: {} .. {} ({} days)\n",
        window.start,
        window.end,
        window.days()
    ));
    if let Some(interval) = &file.interval {
        out.push_str(&format!(
            "Consumption data for interval: {} - {} ({})\n",
            interval.start.format("%Y-%m-%d %H:%M UTC"),
            interval.end.format("%Y-%m-%d %H:%M UTC"),
            interval.granularity.as_str()
        ));
    }

    for (date, day) in &file.days {
        out.push('\n');
        out.push_str(&format!("- {date}:\n"));
        out.push_str(&format_day(day));
    }

    out.push('\n');
    out.push_str(&format_totals(&file.days));
    out
}

fn format_day(day: &DaySummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("\tConsumption: {:.2} kWh\n", day.consumption_total));
    out.push_str(&format!("\tCarbon emitted: {:.2} kg CO2\n", day.carbon_mass_kg()));
    out.push_str("\tGeneration mix:\n");
    for (fuel, perc) in day.generation_mix_average.iter() {
        out.push_str(&format!("\t\t{}: {perc:.2}%\n", fuel.as_str()));
    }
    out
}

/// One-line summary over the whole report.
pub fn format_totals(report: &DailyReport) -> String {
    let totals = compute_totals(report);
    let intensity = totals
        .mean_intensity()
        .map(|g| format!("{g:.1} gCO2/kWh"))
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "Totals: {} day(s) | {:.2} kWh | {:.2} kg CO2 | mean intensity {intensity}\n",
        totals.days,
        totals.consumption,
        totals.carbon_mass / 1000.0,
    )
}
