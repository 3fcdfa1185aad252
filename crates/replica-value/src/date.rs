//! Date instants
//!
//! A Date holds a millisecond-precision instant or the invalid date. The
//! representable range is ±8.64e15 ms around the epoch.

use chrono::{DateTime, SecondsFormat, Utc};

const MAX_TIME_MS: f64 = 8.64e15;

/// Internal slot of a Date object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateData {
    instant: Option<DateTime<Utc>>,
}

impl DateData {
    /// Date for a time value in milliseconds since the epoch. Non-finite or
    /// out-of-range values produce the invalid date.
    pub fn from_millis(ms: f64) -> Self {
        if !ms.is_finite() || ms.abs() > MAX_TIME_MS {
            return Self::invalid();
        }
        Self {
            instant: DateTime::from_timestamp_millis(ms.trunc() as i64),
        }
    }

    /// Date for a chrono instant, truncated to milliseconds
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self::from_millis(instant.timestamp_millis() as f64)
    }

    /// The current time
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// The invalid date
    pub fn invalid() -> Self {
        Self { instant: None }
    }

    /// Whether this is a valid instant
    pub fn is_valid(&self) -> bool {
        self.instant.is_some()
    }

    /// Milliseconds since the epoch, NaN for the invalid date
    pub fn time_value(&self) -> f64 {
        self.instant
            .map_or(f64::NAN, |dt| dt.timestamp_millis() as f64)
    }

    /// The instant, if valid
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }

    /// Replace the time value
    pub fn set_time(&mut self, ms: f64) {
        *self = Self::from_millis(ms);
    }

    /// ISO 8601 form (`2024-01-02T03:04:05.678Z`), None for the invalid date
    pub fn to_iso_string(&self) -> Option<String> {
        self.instant
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}
