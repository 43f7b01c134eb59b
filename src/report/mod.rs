//! Reporting utilities: window totals and formatted terminal output.

use crate::domain::DailyReport;

pub mod format;

pub use format::*;

/// Totals over every day in a report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportTotals {
    pub days: usize,
    /// kWh.
    pub consumption: f64,
    /// Grams of CO2.
    pub carbon_mass: f64,
}

impl ReportTotals {
    /// Consumption-weighted mean intensity (gCO2/kWh), if anything was consumed.
    pub fn mean_intensity(&self) -> Option<f64> {
        (self.consumption > 0.0).then(|| self.carbon_mass / self.consumption)
    }
}

pub fn compute_totals(report: &DailyReport) -> ReportTotals {
    ReportTotals {
        days: report.len(),
        consumption: report.values().map(|d| d.consumption_total).sum(),
        carbon_mass: report.values().map(|d| d.carbon_mass_total).sum(),
    }
}
