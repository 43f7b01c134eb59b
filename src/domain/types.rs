//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by the provider clients after shape validation
//! - consumed by the daily aggregation core
//! - exported to JSON/CSV and reloaded later for printing

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Fuel sources reported in the grid generation mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Gas,
    Coal,
    Biomass,
    Nuclear,
    Hydro,
    Imports,
    Other,
    Wind,
    Solar,
}

impl FuelType {
    pub const ALL: [FuelType; 9] = [
        FuelType::Gas,
        FuelType::Coal,
        FuelType::Biomass,
        FuelType::Nuclear,
        FuelType::Hydro,
        FuelType::Imports,
        FuelType::Other,
        FuelType::Wind,
        FuelType::Solar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FuelType::Gas => "gas",
            FuelType::Coal => "coal",
            FuelType::Biomass => "biomass",
            FuelType::Nuclear => "nuclear",
            FuelType::Hydro => "hydro",
            FuelType::Imports => "imports",
            FuelType::Other => "other",
            FuelType::Wind => "wind",
            FuelType::Solar => "solar",
        }
    }
}

/// Percentage per fuel type, always carrying every `FuelType`.
///
/// Fuels that were never reported hold `0.0`, so consumers never have to
/// handle a missing key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FuelMix(BTreeMap<FuelType, f64>);

impl FuelMix {
    pub fn zeroed() -> Self {
        Self(FuelType::ALL.iter().map(|&fuel| (fuel, 0.0)).collect())
    }

    /// Build a mix from a possibly partial map, zero-filling absent fuels.
    pub fn from_partial(values: BTreeMap<FuelType, f64>) -> Self {
        let mut mix = Self::zeroed();
        for (fuel, value) in values {
            mix.set(fuel, value);
        }
        mix
    }

    pub fn get(&self, fuel: FuelType) -> f64 {
        self.0.get(&fuel).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, fuel: FuelType, value: f64) {
        self.0.insert(fuel, value);
    }

    /// Iterate in `FuelType::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (FuelType, f64)> + '_ {
        self.0.iter().map(|(&fuel, &value)| (fuel, value))
    }
}

impl Default for FuelMix {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<'de> Deserialize<'de> for FuelMix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = BTreeMap::<FuelType, f64>::deserialize(deserializer)?;
        Ok(Self::from_partial(values))
    }
}

/// Interval size requested from the consumption provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Half-hourly intervals (the only size the grid data is published in).
    Hh,
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Hh => "hh",
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }
}

/// Qualitative band attached to each carbon-intensity reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntensityIndex {
    #[serde(rename = "very low")]
    VeryLow,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

/// Anything sampled at the start of a fixed interval.
pub trait Timestamped {
    /// Start of the interval the sample covers.
    fn timestamp(&self) -> DateTime<Utc>;

    /// UTC calendar day the interval starts on.
    fn day(&self) -> NaiveDate {
        self.timestamp().date_naive()
    }
}

/// Meter consumption for one interval.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionSample {
    pub timestamp: DateTime<Utc>,
    /// Energy in kWh as decimal text, exactly as the provider sent it.
    pub consumption: String,
}

/// Grid carbon intensity (gCO2/kWh) for one interval.
#[derive(Debug, Clone, PartialEq)]
pub struct CarbonIntensitySample {
    pub timestamp: DateTime<Utc>,
    pub intensity_actual: Option<f64>,
    pub intensity_forecast: f64,
}

impl CarbonIntensitySample {
    /// Measured intensity when available, otherwise the forecast.
    pub fn effective_intensity(&self) -> f64 {
        self.intensity_actual.unwrap_or(self.intensity_forecast)
    }
}

/// Grid generation mix for one interval.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationMixSample {
    pub timestamp: DateTime<Utc>,
    /// Percentage per fuel; fuels the provider omitted are simply absent.
    pub mix: BTreeMap<FuelType, f64>,
}

impl Timestamped for ConsumptionSample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for CarbonIntensitySample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for GenerationMixSample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// The three interval series for one aggregation call.
#[derive(Debug, Clone, Default)]
pub struct IntervalSeries {
    pub consumption: Vec<ConsumptionSample>,
    pub intensity: Vec<CarbonIntensitySample>,
    pub generation: Vec<GenerationMixSample>,
}

/// One row of the daily report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// kWh.
    pub consumption_total: f64,
    /// Grams of CO2: sum of interval intensity × interval consumption.
    pub carbon_mass_total: f64,
    pub generation_mix_average: FuelMix,
}

impl DaySummary {
    pub fn carbon_mass_kg(&self) -> f64 {
        self.carbon_mass_total / 1000.0
    }
}

/// Day summaries in chronological order.
pub type DailyReport = BTreeMap<NaiveDate, DaySummary>;

/// Half-open `[start, end)` range of whole UTC days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if end <= start {
            return Err(AppError::config(format!(
                "End date {end} must be after start date {start}."
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Range and interval size the consumption provider reports for a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub granularity: Granularity,
}

/// Portable JSON form of a report, reloadable by `footprint show`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFile {
    pub tool: String,
    #[serde(default)]
    pub meter_number: Option<String>,
    pub window: DateWindow,
    #[serde(default)]
    pub interval: Option<ProviderInterval>,
    pub days: DailyReport,
}

/// Fully resolved options for one `report` run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub meter_id: String,
    pub window: DateWindow,
    pub granularity: Granularity,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}
