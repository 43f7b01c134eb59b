//! Daily aggregation of the interval series.
//!
//! Responsibilities:
//!
//! - bucket samples by UTC calendar day (`grouping`)
//! - reduce each series independently, in parallel (`series`)
//! - join the three per-day results and check interval parity (`reconcile`)

use tracing::info;

use crate::domain::{DailyReport, IntervalSeries};
use crate::error::AggregateError;

pub mod grouping;
pub mod reconcile;
pub mod series;

pub use grouping::*;
pub use reconcile::*;
pub use series::*;

/// Aggregate one batch of interval series into per-day summaries.
///
/// The three series passes share nothing and run concurrently; reconciliation
/// starts once all of them have finished.
pub fn summarize_days(series: &IntervalSeries) -> Result<DailyReport, AggregateError> {
    let (consumption, (intensity, generation)) = rayon::join(
        || consumption_per_day(&series.consumption),
        || {
            rayon::join(
                || intensity_per_day(&series.intensity),
                || generation_mix_per_day(&series.generation),
            )
        },
    );
    let consumption = consumption?;

    let report = reconcile(&consumption, &intensity, &generation)?;
    info!(days = report.len(), "aggregated daily summaries");
    Ok(report)
}
