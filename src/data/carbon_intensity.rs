//! National Grid ESO carbon intensity API: intensity and generation mix.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::data::{fetch_json, parse_timestamp, trim_to_window};
use crate::domain::{CarbonIntensitySample, DateWindow, FuelType, GenerationMixSample, IntensityIndex};
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://api.carbonintensity.org.uk";
const PATH_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub struct CarbonIntensityClient {
    client: Client,
    base_url: String,
}

impl CarbonIntensityClient {
    /// Build a client from `CARBON_INTENSITY_API_URL`, falling back to the public API.
    pub fn from_env() -> Result<Self, AppError> {
        let base_url =
            std::env::var("CARBON_INTENSITY_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::new(base_url))
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Half-hourly intensity for the intervals starting inside `window`.
    pub fn fetch_intensity(&self, window: &DateWindow) -> Result<Vec<CarbonIntensitySample>, AppError> {
        let url = self.range_url("intensity", window);
        let body: IntensityResponse = fetch_json(self.client.get(url), "carbon intensity")?;
        let received = body.data.len();
        let samples = trim_to_window(body.into_samples()?, window);
        debug!(received, kept = samples.len(), "fetched carbon intensity");
        Ok(samples)
    }

    /// Generation mix for the intervals starting inside `window`.
    pub fn fetch_generation(&self, window: &DateWindow) -> Result<Vec<GenerationMixSample>, AppError> {
        let url = self.range_url("generation", window);
        let body: GenerationResponse = fetch_json(self.client.get(url), "generation mix")?;
        let received = body.data.len();
        let samples = trim_to_window(body.into_samples()?, window);
        debug!(received, kept = samples.len(), "fetched generation mix");
        Ok(samples)
    }

    fn range_url(&self, resource: &str, window: &DateWindow) -> String {
        let (from, to) = request_range(window);
        format!(
            "{}/{resource}/{}/{}",
            self.base_url,
            from.format(PATH_DATE_FORMAT),
            to.format(PATH_DATE_FORMAT)
        )
    }
}

/// Range to request from the grid API for `window`.
///
/// A bare midnight `from` is answered starting with the interval that ends at
/// midnight, so the request starts one second in.
pub fn request_range(window: &DateWindow) -> (DateTime<Utc>, DateTime<Utc>) {
    (window.start_utc() + Duration::seconds(1), window.end_utc())
}

#[derive(Debug, Deserialize)]
struct IntensityResponse {
    data: Vec<IntensityRecord>,
}

#[derive(Debug, Deserialize)]
struct IntensityRecord {
    from: String,
    to: String,
    intensity: IntensityValues,
}

#[derive(Debug, Deserialize)]
struct IntensityValues {
    forecast: f64,
    actual: Option<f64>,
    index: IntensityIndex,
}

impl IntensityResponse {
    fn into_samples(self) -> Result<Vec<CarbonIntensitySample>, AppError> {
        let mut samples = Vec::with_capacity(self.data.len());
        for record in self.data {
            parse_timestamp(&record.to)?;
            let timestamp = parse_timestamp(&record.from)?;
            trace!(%timestamp, index = ?record.intensity.index, "intensity interval");
            samples.push(CarbonIntensitySample {
                timestamp,
                intensity_actual: record.intensity.actual,
                intensity_forecast: record.intensity.forecast,
            });
        }
        Ok(samples)
    }
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    data: Vec<GenerationRecord>,
}

#[derive(Debug, Deserialize)]
struct GenerationRecord {
    from: String,
    to: String,
    generationmix: Vec<FuelShare>,
}

#[derive(Debug, Deserialize)]
struct FuelShare {
    fuel: FuelType,
    perc: f64,
}

impl GenerationResponse {
    fn into_samples(self) -> Result<Vec<GenerationMixSample>, AppError> {
        let mut samples = Vec::with_capacity(self.data.len());
        for record in self.data {
            parse_timestamp(&record.to)?;
            let timestamp = parse_timestamp(&record.from)?;
            let mut mix = BTreeMap::new();
            for share in record.generationmix {
                if mix.insert(share.fuel, share.perc).is_some() {
                    warn!(%timestamp, fuel = share.fuel.as_str(), "duplicate fuel in generation mix; keeping last");
                }
            }
            samples.push(GenerationMixSample { timestamp, mix });
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn window() -> DateWindow {
        DateWindow::new(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
        )
        .unwrap()
    }

    const INTENSITY_JSON: &str = r#"{
        "data": [
            {"from": "2022-12-31T23:30Z", "to": "2023-01-01T00:00Z",
             "intensity": {"forecast": 90, "actual": 95, "index": "low"}},
            {"from": "2023-01-01T00:00Z", "to": "2023-01-01T00:30Z",
             "intensity": {"forecast": 100, "actual": null, "index": "moderate"}},
            {"from": "2023-01-01T00:30Z", "to": "2023-01-01T01:00Z",
             "intensity": {"forecast": 200, "actual": 210, "index": "very high"}}
        ]
    }"#;

    const GENERATION_JSON: &str = r#"{
        "data": [
            {"from": "2023-01-01T00:00Z", "to": "2023-01-01T00:30Z",
             "generationmix": [
                {"fuel": "gas", "perc": 30.5},
                {"fuel": "wind", "perc": 41.2},
                {"fuel": "solar", "perc": 0}
             ]}
        ]
    }"#;

    #[test]
    fn decodes_intensity_with_nullable_actual() {
        let body: IntensityResponse = serde_json::from_str(INTENSITY_JSON).unwrap();
        let samples = body.into_samples().unwrap();

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1].timestamp, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(samples[1].intensity_actual, None);
        assert_eq!(samples[1].effective_intensity(), 100.0);
        assert_eq!(samples[2].effective_intensity(), 210.0);
    }

    #[test]
    fn intensity_trimmed_to_window_drops_previous_day() {
        let body: IntensityResponse = serde_json::from_str(INTENSITY_JSON).unwrap();
        let samples = trim_to_window(body.into_samples().unwrap(), &window());

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn rejects_unknown_intensity_index() {
        let json = INTENSITY_JSON.replace(r#""index": "low""#, r#""index": "extreme""#);
        let result: Result<IntensityResponse, _> = serde_json::from_str(&json);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_bad_interval_end() {
        let json = INTENSITY_JSON.replace(r#""to": "2023-01-01T00:30Z""#, r#""to": "later""#);
        let body: IntensityResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(body.into_samples().unwrap_err().exit_code(), 4);
    }

    #[test]
    fn decodes_generation_mix_per_fuel() {
        let body: GenerationResponse = serde_json::from_str(GENERATION_JSON).unwrap();
        let samples = body.into_samples().unwrap();

        assert_eq!(samples.len(), 1);
        let mix = &samples[0].mix;
        assert_eq!(mix.len(), 3);
        assert_eq!(mix[&FuelType::Wind], 41.2);
        assert!(!mix.contains_key(&FuelType::Coal));
    }

    #[test]
    fn rejects_unknown_fuel() {
        let json = GENERATION_JSON.replace(r#""fuel": "gas""#, r#""fuel": "fusion""#);
        let result: Result<GenerationResponse, _> = serde_json::from_str(&json);
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_fuel_keeps_last_value() {
        let json = GENERATION_JSON.replace(r#""fuel": "solar""#, r#""fuel": "gas""#);
        let body: GenerationResponse = serde_json::from_str(&json).unwrap();
        let samples = body.into_samples().unwrap();
        assert_eq!(samples[0].mix[&FuelType::Gas], 0.0);
    }

    #[test]
    fn request_range_starts_one_second_after_midnight() {
        let (from, to) = request_range(&window());
        assert_eq!(from, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 1).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn range_url_uses_second_precision() {
        let client = CarbonIntensityClient::new("https://example.test/");
        assert_eq!(
            client.range_url("intensity", &window()),
            "https://example.test/intensity/2023-01-01T00:00:01/2023-01-02T00:00:00"
        );
    }
}
