//! Calendar-day bucketing of interval samples.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::Timestamped;

/// Values grouped by UTC calendar day, each bucket in input order.
///
/// Bucket order is interval order; the reconciler pairs consumption and
/// intensity values by position, so buckets must never be reordered.
pub type DayBuckets<V> = BTreeMap<NaiveDate, Vec<V>>;

/// Group `records` by the UTC day of their timestamp, keeping `extract(record)`.
///
/// Days without samples have no entry. Nothing is deduplicated or filled in.
pub fn group_by_day<'a, T, V, F>(records: &'a [T], mut extract: F) -> DayBuckets<V>
where
    T: Timestamped,
    F: FnMut(&'a T) -> V,
{
    let mut buckets: DayBuckets<V> = BTreeMap::new();
    for record in records {
        buckets.entry(record.day()).or_default().push(extract(record));
    }
    buckets
}

/// Like [`group_by_day`], stopping at the first extraction error.
pub fn try_group_by_day<'a, T, V, E, F>(
    records: &'a [T],
    mut extract: F,
) -> Result<DayBuckets<V>, E>
where
    T: Timestamped,
    F: FnMut(&'a T) -> Result<V, E>,
{
    let mut buckets: DayBuckets<V> = BTreeMap::new();
    for record in records {
        buckets.entry(record.day()).or_default().push(extract(record)?);
    }
    Ok(buckets)
}
