//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - interval samples for the three input series (`ConsumptionSample`, etc.)
//! - the fuel enumeration and the zero-filled `FuelMix`
//! - daily outputs (`DaySummary`, `DailyReport`) and run options (`ReportConfig`)

pub mod types;

pub use types::*;
