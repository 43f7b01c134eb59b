//! Per-series daily aggregation.
//!
//! Each function is a pure pass over one input series:
//! - consumption: kWh per interval, grouped by day
//! - carbon intensity: effective gCO2/kWh per interval, grouped by day
//! - generation mix: per-fuel mean percentage per day

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::aggregate::grouping::{DayBuckets, group_by_day, try_group_by_day};
use crate::domain::{CarbonIntensitySample, ConsumptionSample, FuelMix, FuelType, GenerationMixSample};
use crate::error::AggregateError;

/// Parse one consumption reading. Rejects non-numeric, non-finite and negative text.
pub fn parse_consumption(sample: &ConsumptionSample) -> Result<f64, AggregateError> {
    let malformed = || AggregateError::MalformedInput {
        timestamp: sample.timestamp,
        raw: sample.consumption.clone(),
    };
    let value = sample.consumption.trim().parse::<f64>().map_err(|_| malformed())?;
    if !value.is_finite() || value < 0.0 {
        return Err(malformed());
    }
    Ok(value)
}

/// Consumption values (kWh) per day, one per interval.
pub fn consumption_per_day(samples: &[ConsumptionSample]) -> Result<DayBuckets<f64>, AggregateError> {
    try_group_by_day(samples, parse_consumption)
}

/// Effective carbon intensity per day, one per interval.
pub fn intensity_per_day(samples: &[CarbonIntensitySample]) -> DayBuckets<f64> {
    let fallbacks = samples.iter().filter(|s| s.intensity_actual.is_none()).count();
    if fallbacks > 0 {
        debug!(fallbacks, total = samples.len(), "using forecast intensity where actual is missing");
    }
    group_by_day(samples, CarbonIntensitySample::effective_intensity)
}

/// Average percentage per fuel per day.
///
/// A fuel's average only counts the samples that reported it. Every day in
/// the output carries all fuels; unreported ones are `0.0`.
pub fn generation_mix_per_day(samples: &[GenerationMixSample]) -> BTreeMap<NaiveDate, FuelMix> {
    group_by_day(samples, |s| &s.mix)
        .into_iter()
        .map(|(day, mixes)| (day, average_mix(&mixes)))
        .collect()
}

fn average_mix(mixes: &[&BTreeMap<FuelType, f64>]) -> FuelMix {
    let mut out = FuelMix::zeroed();
    for fuel in FuelType::ALL {
        let (sum, count) = mixes
            .iter()
            .filter_map(|mix| mix.get(&fuel))
            .fold((0.0, 0usize), |(sum, count), perc| (sum + perc, count + 1));
        if count > 0 {
            out.set(fuel, sum / count as f64);
        }
    }
    out
}
