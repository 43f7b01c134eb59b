//! OpenVolt API integration: meter lookup and interval consumption.

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::data::{fetch_json, parse_timestamp, require_id, trim_to_window};
use crate::domain::{ConsumptionSample, DateWindow, Granularity, ProviderInterval};
use crate::error::AppError;

const API_KEY_HEADER: &str = "x-api-key";
const QUERY_DATE_FORMAT: &str = "%Y-%m-%-d";
const EXPECTED_UNITS: &str = "kWh";

#[derive(Debug, Clone, PartialEq)]
pub struct Meter {
    pub meter_number: String,
    pub customer_id: String,
    pub customer_name: String,
}

/// Consumption for one meter over a window, trimmed to `[start, end)`.
#[derive(Debug, Clone)]
pub struct ConsumptionSeries {
    pub interval: ProviderInterval,
    pub samples: Vec<ConsumptionSample>,
}

pub struct OpenVoltClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenVoltClient {
    pub fn from_env() -> Result<Self, AppError> {
        let base_url = std::env::var("OPENVOLT_API_URL")
            .map_err(|_| AppError::config("Missing OPENVOLT_API_URL in environment (.env)."))?;
        let api_key = std::env::var("OPENVOLT_API_KEY")
            .map_err(|_| AppError::config("Missing OPENVOLT_API_KEY in environment (.env)."))?;
        Ok(Self::new(base_url, api_key))
    }

    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn fetch_meter(&self, id: &str) -> Result<Meter, AppError> {
        let req = self
            .client
            .get(format!("{}/v1/meters/{}", self.base_url, id.trim()))
            .header(API_KEY_HEADER, &self.api_key);
        let body: MeterResponse = fetch_json(req, &format!("OpenVolt meter {id}"))?;
        body.into_meter()
    }

    /// Fetch consumption for the intervals starting inside `window`.
    pub fn fetch_consumption(
        &self,
        meter: &Meter,
        granularity: Granularity,
        window: &DateWindow,
    ) -> Result<ConsumptionSeries, AppError> {
        let start = window.start.format(QUERY_DATE_FORMAT).to_string();
        let end = window.end.format(QUERY_DATE_FORMAT).to_string();
        let req = self
            .client
            .get(format!("{}/v1/interval-data", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[
                ("meter_number", meter.meter_number.as_str()),
                ("customer_id", meter.customer_id.as_str()),
                ("granularity", granularity.as_str()),
                ("start_date", start.as_str()),
                ("end_date", end.as_str()),
            ]);

        let body: IntervalDataResponse =
            fetch_json(req, &format!("OpenVolt consumption for meter {}", meter.meter_number))?;
        let mut series = body.into_series()?;
        let received = series.samples.len();
        series.samples = trim_to_window(series.samples, window);
        debug!(received, kept = series.samples.len(), "fetched consumption");
        Ok(series)
    }
}

#[derive(Debug, Deserialize)]
struct MeterResponse {
    #[serde(rename = "_id")]
    id: String,
    meter_number: String,
    customer: CustomerResponse,
}

#[derive(Debug, Deserialize)]
struct CustomerResponse {
    #[serde(rename = "_id")]
    id: String,
    name: String,
}

impl MeterResponse {
    fn into_meter(self) -> Result<Meter, AppError> {
        require_id(&self.id, "meter id")?;
        Ok(Meter {
            meter_number: require_id(&self.meter_number, "meter number")?,
            customer_id: require_id(&self.customer.id, "customer id")?,
            customer_name: self.customer.name,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntervalDataResponse {
    start_interval: String,
    end_interval: String,
    granularity: Granularity,
    data: Vec<IntervalRecord>,
}

#[derive(Debug, Deserialize)]
struct IntervalRecord {
    start_interval: String,
    meter_id: String,
    customer_id: String,
    consumption: String,
    consumption_units: String,
}

impl IntervalDataResponse {
    fn into_series(self) -> Result<ConsumptionSeries, AppError> {
        let mut samples = Vec::with_capacity(self.data.len());
        for record in self.data {
            require_id(&record.meter_id, "meter id")?;
            require_id(&record.customer_id, "customer id")?;
            if record.consumption_units != EXPECTED_UNITS {
                warn!(units = %record.consumption_units, "unexpected consumption units");
            }
            samples.push(ConsumptionSample {
                timestamp: parse_timestamp(&record.start_interval)?,
                consumption: record.consumption,
            });
        }

        Ok(ConsumptionSeries {
            interval: ProviderInterval {
                start: parse_timestamp(&self.start_interval)?,
                end: parse_timestamp(&self.end_interval)?,
                granularity: self.granularity,
            },
            samples,
        })
    }
}
