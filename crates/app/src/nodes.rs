//! Automation nodes — one poll-cycle orchestration per device.
//!
//! A node owns its controller state, its pin assignment, and an
//! [`Arc<ConfigChannel>`](crate::config_channel::ConfigChannel) shared with
//! the management transport. Every cycle re-reads the channel fresh (no
//! caching of externally owned parameters), runs the domain transition,
//! issues actuator writes, and pushes a full state snapshot through the
//! [`StateReporter`](crate::ports::StateReporter) port.

pub mod door_light;
pub mod morning;
pub mod thermostat;

pub use door_light::DoorLightNode;
pub use morning::MorningRoutineNode;
pub use thermostat::ThermostatNode;

/// In-memory port doubles shared by the node tests.
#[cfg(test)]
pub(crate) mod harness {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use homenode_domain::config::SettingValue;
    use homenode_domain::error::{PortError, ReportError};
    use homenode_domain::pin::{AnalogPin, Pin, celsius_to_raw};

    use crate::ports::{GpioPort, StateReporter};

    pub const ANALOG_LOW: f64 = 0.0;
    pub const ANALOG_HIGH: f64 = 1023.0;

    /// Recorded actuator write.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Write {
        Digital(Pin, bool),
        Custom(Pin, String),
    }

    /// Scriptable pin backend that records every write.
    #[derive(Default)]
    pub struct FakeBoard {
        pub analog: Mutex<HashMap<u16, f64>>,
        pub digital: Mutex<HashMap<u16, bool>>,
        pub custom: Mutex<HashMap<u16, String>>,
        pub writes: Mutex<Vec<Write>>,
    }

    impl FakeBoard {
        pub fn set_celsius(&self, pin: AnalogPin, celsius: f64) {
            self.analog
                .lock()
                .unwrap()
                .insert(pin.0, celsius_to_raw(celsius, ANALOG_LOW, ANALOG_HIGH));
        }

        pub fn set_digital(&self, pin: Pin, level: bool) {
            self.digital.lock().unwrap().insert(pin.0, level);
        }

        pub fn set_custom(&self, pin: Pin, value: &str) {
            self.custom.lock().unwrap().insert(pin.0, value.to_string());
        }

        pub fn writes(&self) -> Vec<Write> {
            self.writes.lock().unwrap().clone()
        }

        pub fn clear_writes(&self) {
            self.writes.lock().unwrap().clear();
        }

        /// Writes to one digital pin, in order.
        pub fn digital_history(&self, pin: Pin) -> Vec<bool> {
            self.writes()
                .into_iter()
                .filter_map(|write| match write {
                    Write::Digital(p, level) if p == pin => Some(level),
                    _ => None,
                })
                .collect()
        }

        /// Writes to one custom pin, in order.
        pub fn custom_history(&self, pin: Pin) -> Vec<String> {
            self.writes()
                .into_iter()
                .filter_map(|write| match write {
                    Write::Custom(p, value) if p == pin => Some(value),
                    _ => None,
                })
                .collect()
        }
    }

    impl GpioPort for &FakeBoard {
        fn analog_bounds(&self) -> (f64, f64) {
            (ANALOG_LOW, ANALOG_HIGH)
        }

        async fn analog_read(&self, pin: AnalogPin) -> Result<f64, PortError> {
            self.analog
                .lock()
                .unwrap()
                .get(&pin.0)
                .copied()
                .ok_or_else(|| PortError::new(pin.0, "analog_read", "no scripted value"))
        }

        async fn digital_read(&self, pin: Pin) -> Result<bool, PortError> {
            Ok(self.digital.lock().unwrap().get(&pin.0).copied().unwrap_or(false))
        }

        async fn digital_write(&self, pin: Pin, level: bool) -> Result<(), PortError> {
            self.writes.lock().unwrap().push(Write::Digital(pin, level));
            Ok(())
        }

        async fn custom_read(&self, pin: Pin) -> Result<String, PortError> {
            Ok(self
                .custom
                .lock()
                .unwrap()
                .get(&pin.0)
                .cloned()
                .unwrap_or_else(|| "0".to_string()))
        }

        async fn custom_write(&self, pin: Pin, value: &str) -> Result<(), PortError> {
            self.writes
                .lock()
                .unwrap()
                .push(Write::Custom(pin, value.to_string()));
            Ok(())
        }
    }

    /// Reporter that records every pushed snapshot.
    #[derive(Default)]
    pub struct RecordingReporter {
        pub reports: Mutex<Vec<Vec<SettingValue>>>,
    }

    impl StateReporter for &RecordingReporter {
        async fn report_states(&self, values: &[SettingValue]) -> Result<(), ReportError> {
            self.reports.lock().unwrap().push(values.to_vec());
            Ok(())
        }
    }
}
