//! # homenode-adapter-gpio-sim
//!
//! Simulated pin backend implementing
//! [`GpioPort`](homenode_app::ports::GpioPort).
//!
//! The board is a shared in-memory register file: analog inputs, digital
//! levels, and custom-protocol device strings keyed by pin address. Clones
//! share the same registers, so a test (or a demo harness task) can poke
//! sensor values while the nodes run against the same board.
//!
//! Reading an analog pin that was never set is an error, mirroring a real
//! sensor that is not wired. Digital and custom reads default to low / `"0"`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use homenode_app::ports::GpioPort;
use homenode_domain::error::PortError;
use homenode_domain::pin::{AnalogPin, Pin, celsius_to_raw};

/// Full-scale bounds of the simulated analog inputs (10-bit converter).
pub const ANALOG_LOW: f64 = 0.0;
pub const ANALOG_HIGH: f64 = 1023.0;

#[derive(Debug, Default)]
struct Registers {
    analog: HashMap<u16, f64>,
    digital: HashMap<u16, bool>,
    custom: HashMap<u16, String>,
}

/// Shared simulated board.
#[derive(Debug, Clone, Default)]
pub struct SimBoard {
    registers: Arc<Mutex<Registers>>,
}

impl SimBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_registers<T>(&self, f: impl FnOnce(&mut Registers) -> T) -> T {
        f(&mut self.registers.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Set a raw analog level.
    pub fn set_analog(&self, pin: AnalogPin, raw: f64) {
        self.with_registers(|registers| {
            registers.analog.insert(pin.0, raw);
        });
    }

    /// Set an analog temperature sensor to the given Celsius reading.
    pub fn set_celsius(&self, pin: AnalogPin, celsius: f64) {
        self.set_analog(pin, celsius_to_raw(celsius, ANALOG_LOW, ANALOG_HIGH));
    }

    /// Set a digital input level.
    pub fn set_digital(&self, pin: Pin, level: bool) {
        self.with_registers(|registers| {
            registers.digital.insert(pin.0, level);
        });
    }

    /// Set a custom-protocol device reading.
    pub fn set_custom(&self, pin: Pin, value: impl Into<String>) {
        let value = value.into();
        self.with_registers(|registers| {
            registers.custom.insert(pin.0, value);
        });
    }

    /// Last level written to a digital pin, if any.
    #[must_use]
    pub fn digital_level(&self, pin: Pin) -> Option<bool> {
        self.with_registers(|registers| registers.digital.get(&pin.0).copied())
    }

    /// Last value written to a custom-protocol pin, if any.
    #[must_use]
    pub fn custom_value(&self, pin: Pin) -> Option<String> {
        self.with_registers(|registers| registers.custom.get(&pin.0).cloned())
    }
}

impl GpioPort for SimBoard {
    fn analog_bounds(&self) -> (f64, f64) {
        (ANALOG_LOW, ANALOG_HIGH)
    }

    async fn analog_read(&self, pin: AnalogPin) -> Result<f64, PortError> {
        self.with_registers(|registers| {
            registers
                .analog
                .get(&pin.0)
                .copied()
                .ok_or_else(|| PortError::new(pin.0, "analog_read", "analog pin not wired"))
        })
    }

    async fn digital_read(&self, pin: Pin) -> Result<bool, PortError> {
        Ok(self.with_registers(|registers| registers.digital.get(&pin.0).copied().unwrap_or(false)))
    }

    async fn digital_write(&self, pin: Pin, level: bool) -> Result<(), PortError> {
        tracing::trace!(pin = %pin, level, "digital write");
        self.with_registers(|registers| {
            registers.digital.insert(pin.0, level);
        });
        Ok(())
    }

    async fn custom_read(&self, pin: Pin) -> Result<String, PortError> {
        Ok(self.with_registers(|registers| {
            registers
                .custom
                .get(&pin.0)
                .cloned()
                .unwrap_or_else(|| "0".to_string())
        }))
    }

    async fn custom_write(&self, pin: Pin, value: &str) -> Result<(), PortError> {
        tracing::trace!(pin = %pin, value, "custom write");
        self.with_registers(|registers| {
            registers.custom.insert(pin.0, value.to_string());
        });
        Ok(())
    }
}
