//! Time and timestamp helpers.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// UTC timestamp used for telemetry samples.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Wall-clock moment a controller polls at, reduced to what the control
/// laws actually consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalMoment {
    /// Hour of day, `0..=23`.
    pub hour: u8,
    /// Minute of hour, `0..=59`.
    pub minute: u8,
}

impl LocalMoment {
    #[must_use]
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// Reduce a full timestamp to its local hour/minute.
    #[must_use]
    pub fn from_datetime<Tz: chrono::TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            hour: u8::try_from(dt.hour()).unwrap_or(0),
            minute: u8::try_from(dt.minute()).unwrap_or(0),
        }
    }
}

/// An hour-of-day window that may wrap around midnight.
///
/// The window holds when `hour >= start_hour || hour <= end_hour`, which is
/// the evening-to-morning shape the door light uses (e.g. 20:00 → 08:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl HourWindow {
    #[must_use]
    pub fn new(start_hour: u8, end_hour: u8) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// Whether the given hour falls inside the window.
    #[must_use]
    pub fn contains(&self, hour: u8) -> bool {
        hour >= self.start_hour || hour <= self.end_hour
    }
}
