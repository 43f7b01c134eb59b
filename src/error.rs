use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Exit code for configuration, usage and local file problems.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for data that could not be aggregated.
pub const EXIT_AGGREGATE: u8 = 3;
/// Exit code for upstream fetch/decode failures.
pub const EXIT_UPSTREAM: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(EXIT_CONFIG, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(EXIT_UPSTREAM, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<AggregateError> for AppError {
    fn from(err: AggregateError) -> Self {
        Self::new(EXIT_AGGREGATE, err.to_string())
    }
}

/// One day whose consumption and carbon-intensity series disagree on interval count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayMismatch {
    pub date: NaiveDate,
    pub consumption_intervals: usize,
    /// Zero when the intensity series has no samples at all for the day.
    pub intensity_intervals: usize,
}

impl std::fmt::Display for DayMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} consumption vs {} intensity)",
            self.date, self.consumption_intervals, self.intensity_intervals
        )
    }
}

/// Failures of the daily aggregation core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    #[error("Malformed consumption value '{raw}' for interval starting {timestamp}")]
    MalformedInput { timestamp: DateTime<Utc>, raw: String },
    #[error("Interval counts do not match for {} day(s): {}", .days.len(), join_days(.days))]
    IntervalCountMismatch { days: Vec<DayMismatch> },
}

fn join_days(days: &[DayMismatch]) -> String {
    let parts: Vec<String> = days.iter().map(|d| d.to_string()).collect();
    parts.join(", ")
}
