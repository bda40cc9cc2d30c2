//! Pin address newtypes and the analog temperature conversion.

use serde::{Deserialize, Serialize};

/// Address of a digital or custom-protocol pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pin(pub u16);

impl std::fmt::Display for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Address of an analog input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalogPin(pub u16);

impl std::fmt::Display for AnalogPin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Convert a raw analog reading to degrees Celsius.
///
/// `low`/`high` are the board's analog full-scale bounds; the sensor maps
/// that range linearly onto -100 °C … +100 °C.
#[must_use]
pub fn raw_to_celsius(raw: f64, low: f64, high: f64) -> f64 {
    raw * 200.0 / (high - low) - 100.0
}

/// Inverse of [`raw_to_celsius`], used by simulated boards.
#[must_use]
pub fn celsius_to_raw(celsius: f64, low: f64, high: f64) -> f64 {
    (celsius + 100.0) * (high - low) / 200.0
}
