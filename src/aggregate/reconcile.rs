//! Join the per-day series into `DaySummary` rows.
//!
//! Consumption drives the join: a day appears in the report iff it has
//! consumption samples. For each such day the intensity series must have the
//! same number of intervals, because carbon mass is computed by pairing the
//! two series index by index. Any disagreement fails the whole batch.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::aggregate::grouping::DayBuckets;
use crate::domain::{DailyReport, DaySummary, FuelMix};
use crate::error::{AggregateError, DayMismatch};

/// Combine the three per-day series. Returns every mismatched day on failure.
pub fn reconcile(
    consumption: &DayBuckets<f64>,
    intensity: &DayBuckets<f64>,
    generation: &BTreeMap<NaiveDate, FuelMix>,
) -> Result<DailyReport, AggregateError> {
    let mut report = DailyReport::new();
    let mut mismatched = Vec::new();

    for (&date, kwh) in consumption {
        let grams_per_kwh = intensity.get(&date).map(Vec::as_slice).unwrap_or(&[]);
        if grams_per_kwh.len() != kwh.len() {
            mismatched.push(DayMismatch {
                date,
                consumption_intervals: kwh.len(),
                intensity_intervals: grams_per_kwh.len(),
            });
            continue;
        }

        let summary = DaySummary {
            consumption_total: kwh.iter().sum(),
            carbon_mass_total: weighted_sum(kwh, grams_per_kwh),
            generation_mix_average: generation.get(&date).cloned().unwrap_or_default(),
        };
        report.insert(date, summary);
    }

    if !mismatched.is_empty() {
        for day in &mismatched {
            warn!(
                date = %day.date,
                consumption = day.consumption_intervals,
                intensity = day.intensity_intervals,
                "interval count mismatch"
            );
        }
        return Err(AggregateError::IntervalCountMismatch { days: mismatched });
    }

    Ok(report)
}

/// Σ a[i] * b[i] over equal-length slices.
fn weighted_sum(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, w)| x * w).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FuelType;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, day).unwrap()
    }

    fn buckets(days: &[(u32, Vec<f64>)]) -> DayBuckets<f64> {
        days.iter().map(|(d, v)| (date(*d), v.clone())).collect()
    }

    #[test]
    fn weights_consumption_by_interval_intensity() {
        let consumption = buckets(&[(1, vec![10.0, 20.0])]);
        let intensity = buckets(&[(1, vec![100.0, 200.0])]);
        let mut mix = FuelMix::zeroed();
        mix.set(FuelType::Gas, 20.0);
        mix.set(FuelType::Coal, 30.0);
        let generation = BTreeMap::from([(date(1), mix.clone())]);

        let report = reconcile(&consumption, &intensity, &generation).unwrap();

        assert_eq!(report.len(), 1);
        let day = &report[&date(1)];
        assert_eq!(day.consumption_total, 30.0);
        assert_eq!(day.carbon_mass_total, 5000.0);
        assert_eq!(day.generation_mix_average, mix);
    }

    #[test]
    fn weighting_is_positional_not_averaged() {
        // Mean intensity (150) * total (30) would give 4500.
        let consumption = buckets(&[(1, vec![0.0, 30.0])]);
        let intensity = buckets(&[(1, vec![100.0, 200.0])]);
        let report = reconcile(&consumption, &intensity, &BTreeMap::new()).unwrap();
        assert_eq!(report[&date(1)].carbon_mass_total, 6000.0);
    }

    #[test]
    fn missing_generation_day_is_zero_mix() {
        let consumption = buckets(&[(1, vec![1.0])]);
        let intensity = buckets(&[(1, vec![50.0])]);
        let report = reconcile(&consumption, &intensity, &BTreeMap::new()).unwrap();
        assert_eq!(report[&date(1)].generation_mix_average, FuelMix::zeroed());
    }

    #[test]
    fn days_without_consumption_are_ignored() {
        let consumption = buckets(&[(2, vec![1.0])]);
        let intensity = buckets(&[(1, vec![10.0]), (2, vec![20.0]), (3, vec![30.0])]);
        let generation = BTreeMap::from([(date(3), FuelMix::zeroed())]);

        let report = reconcile(&consumption, &intensity, &generation).unwrap();
        assert_eq!(report.keys().copied().collect::<Vec<_>>(), vec![date(2)]);
    }

    #[test]
    fn count_mismatch_fails_whole_batch() {
        let consumption = buckets(&[(1, vec![1.0, 2.0]), (2, vec![3.0])]);
        let intensity = buckets(&[(1, vec![10.0]), (2, vec![20.0])]);

        let err = reconcile(&consumption, &intensity, &BTreeMap::new()).unwrap_err();
        assert_eq!(
            err,
            AggregateError::IntervalCountMismatch {
                days: vec![DayMismatch {
                    date: date(1),
                    consumption_intervals: 2,
                    intensity_intervals: 1,
                }],
            }
        );
    }

    #[test]
    fn reports_every_mismatched_day() {
        let consumption = buckets(&[(1, vec![1.0, 2.0]), (2, vec![3.0]), (3, vec![4.0, 5.0]), (4, vec![6.0])]);
        let intensity = buckets(&[(1, vec![10.0]), (2, vec![20.0]), (4, vec![40.0, 41.0])]);

        let Err(AggregateError::IntervalCountMismatch { days }) =
            reconcile(&consumption, &intensity, &BTreeMap::new())
        else {
            panic!("expected interval count mismatch");
        };

        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(1), date(3), date(4)]);
        assert_eq!(days[1].intensity_intervals, 0);
    }

    #[test]
    fn empty_consumption_yields_empty_report() {
        let intensity = buckets(&[(1, vec![10.0])]);
        let report = reconcile(&DayBuckets::new(), &intensity, &BTreeMap::new()).unwrap();
        assert!(report.is_empty());
    }
}
