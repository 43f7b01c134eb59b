//! Remote data providers.
//!
//! - OpenVolt meter + half-hourly consumption (`openvolt`)
//! - GB grid carbon intensity + generation mix (`carbon_intensity`)
//!
//! Both clients decode responses into private wire structs first, then convert
//! them into domain samples, so shape problems surface as exit code 4 with the
//! endpoint named.

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::blocking::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::domain::{DateWindow, Timestamped};
use crate::error::AppError;

pub mod carbon_intensity;
pub mod openvolt;

pub use carbon_intensity::*;
pub use openvolt::*;

/// Send a request and decode a JSON body, naming `what` in any error.
fn fetch_json<T: DeserializeOwned>(req: RequestBuilder, what: &str) -> Result<T, AppError> {
    let resp = req
        .send()
        .map_err(|e| AppError::upstream(format!("{what} request failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(AppError::upstream(format!(
            "{what} request failed with status {}.",
            resp.status()
        )));
    }

    resp.json()
        .map_err(|e| AppError::upstream(format!("Failed to parse {what} response: {e}")))
}

/// Parse a provider timestamp as UTC.
///
/// Accepted forms: all-digit epoch milliseconds, RFC 3339, and the
/// minute-precision `2023-01-01T00:30Z` used by the carbon intensity API.
/// Zone-less date-times are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let trimmed = raw.trim();
    let invalid = || AppError::upstream(format!("Invalid timestamp '{raw}'."));

    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let millis: i64 = trimmed.parse().map_err(|_| invalid())?;
        return DateTime::from_timestamp_millis(millis).ok_or_else(invalid);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%MZ", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc());
        }
    }

    Err(invalid())
}

/// Keep only samples whose interval starts inside `[window.start, window.end)`.
///
/// Providers include boundary intervals on either side of the requested
/// range, but not reliably (the trailing one is missing while the window is
/// still open), so samples are matched by timestamp rather than position.
pub fn trim_to_window<T: Timestamped>(samples: Vec<T>, window: &DateWindow) -> Vec<T> {
    let (start, end) = (window.start_utc(), window.end_utc());
    samples
        .into_iter()
        .filter(|s| {
            let ts = s.timestamp();
            start <= ts && ts < end
        })
        .collect()
}

/// Trim an identifier and reject it if nothing is left.
fn require_id(raw: &str, field: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::upstream(format!("Empty {field} in provider response.")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    use crate::domain::ConsumptionSample;

    fn window() -> DateWindow {
        DateWindow::new(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
        )
        .unwrap()
    }

    fn sample(day: u32, hour: u32, minute: u32) -> ConsumptionSample {
        ConsumptionSample {
            timestamp: Utc.with_ymd_and_hms(2023, 1, day, hour, minute, 0).unwrap(),
            consumption: "1".to_string(),
        }
    }

    fn hours(samples: &[ConsumptionSample]) -> Vec<String> {
        samples.iter().map(|s| s.timestamp.format("%d %H:%M").to_string()).collect()
    }

    #[test]
    fn parses_supported_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2023, 1, 1, 0, 30, 0).unwrap();
        for raw in [
            "2023-01-01T00:30:00.000Z",
            "2023-01-01T00:30:00+00:00",
            "2023-01-01T01:30:00+01:00",
            "2023-01-01T00:30Z",
            "2023-01-01T00:30:00",
            "1672533000000",
        ] {
            assert_eq!(parse_timestamp(raw).unwrap(), expected, "{raw}");
        }
    }

    #[test]
    fn rejects_unparseable_timestamps() {
        for raw in ["", "yesterday", "2023-13-01T00:00Z", "12:30"] {
            let err = parse_timestamp(raw).unwrap_err();
            assert_eq!(err.exit_code(), 4, "{raw}");
        }
    }

    #[test]
    fn ids_are_trimmed_and_non_empty() {
        assert_eq!(require_id("  abc ", "meter id").unwrap(), "abc");
        assert!(require_id("   ", "meter id").is_err());
    }

    #[test]
    fn trim_drops_trailing_boundary_sample() {
        let kept = trim_to_window(vec![sample(1, 0, 0), sample(1, 23, 30), sample(2, 0, 0)], &window());
        assert_eq!(hours(&kept), ["01 00:00", "01 23:30"]);
    }

    #[test]
    fn trim_keeps_last_interval_when_boundary_is_absent() {
        let kept = trim_to_window(vec![sample(1, 0, 0), sample(1, 23, 30)], &window());
        assert_eq!(hours(&kept), ["01 00:00", "01 23:30"]);
    }

    #[test]
    fn trim_drops_leading_sample_from_previous_day() {
        let previous = ConsumptionSample {
            timestamp: Utc.with_ymd_and_hms(2022, 12, 31, 23, 30, 0).unwrap(),
            consumption: "1".to_string(),
        };
        let kept = trim_to_window(vec![previous, sample(1, 0, 0), sample(1, 0, 30)], &window());
        assert_eq!(hours(&kept), ["01 00:00", "01 00:30"]);
        assert!(trim_to_window(Vec::<ConsumptionSample>::new(), &window()).is_empty());
    }
}
