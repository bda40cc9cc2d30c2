//! Pin IO port — abstract sensor reads and actuator writes.
//!
//! Every operation is bounded-time by assumption; a failure is returned as a
//! [`PortError`] which callers log before continuing with the next poll.

use std::future::Future;

use homenode_domain::error::PortError;
use homenode_domain::pin::{AnalogPin, Pin};

/// Abstract pin backend (real board or simulation).
pub trait GpioPort: Send + Sync {
    /// Full-scale `(low, high)` bounds of the analog inputs.
    fn analog_bounds(&self) -> (f64, f64);

    /// Read a raw analog level.
    fn analog_read(&self, pin: AnalogPin)
    -> impl Future<Output = Result<f64, PortError>> + Send;

    /// Read a binary input.
    fn digital_read(&self, pin: Pin) -> impl Future<Output = Result<bool, PortError>> + Send;

    /// Drive a binary output.
    fn digital_write(
        &self,
        pin: Pin,
        level: bool,
    ) -> impl Future<Output = Result<(), PortError>> + Send;

    /// Read a custom-protocol device (door sensor, display readback).
    fn custom_read(&self, pin: Pin) -> impl Future<Output = Result<String, PortError>> + Send;

    /// Write to a custom-protocol device (tri-state lamp, display, coffee
    /// machine).
    fn custom_write(
        &self,
        pin: Pin,
        value: &str,
    ) -> impl Future<Output = Result<(), PortError>> + Send;
}
