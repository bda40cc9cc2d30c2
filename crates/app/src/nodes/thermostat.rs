//! Multi-room thermostat node.
//!
//! Every room runs its own hysteresis controller each poll; the config
//! channel exposes the settings of the *chosen* room only. Selecting a
//! different room republishes that room's mode and thresholds into the
//! channel so the management view always shows the values the controller is
//! actually using.

use std::sync::Arc;

use homenode_domain::climate::{ClimateEvent, RoomClimate};
use homenode_domain::config::{NumberSpec, SettingSchema, SettingValue};
use homenode_domain::mode::ThermostatMode;
use homenode_domain::pin::{Pin, raw_to_celsius};
use homenode_domain::telemetry::TemperatureSample;
use homenode_domain::time::{LocalMoment, now};

use crate::config_channel::ConfigChannel;
use crate::ports::{GpioPort, StateReporter, TelemetrySink};
use crate::scheduler::Node;
use crate::telemetry_forwarder::TelemetryForwarder;

const ROOM: &str = "Room";
const MODE: &str = "Mode";
const TEMPERATURE: &str = "Temperature";
const COOL_THRESHOLD: &str = "Auto Cool Temperature";
const HEAT_THRESHOLD: &str = "Auto Heat Temperature";

/// Settings registered by a thermostat over the given rooms, with initial
/// values taken from the first room.
#[must_use]
pub fn settings(rooms: &[RoomClimate]) -> Vec<(SettingSchema, SettingValue)> {
    let room_options = rooms
        .iter()
        .enumerate()
        .map(|(index, room)| (index.to_string(), room.name.clone()))
        .collect();
    let first = &rooms[0];
    vec![
        (
            SettingSchema::options(ROOM, room_options, true),
            SettingValue::Code("0".to_string()),
        ),
        (
            SettingSchema::options(MODE, ThermostatMode::options(), true),
            SettingValue::Code(first.mode.code().to_string()),
        ),
        (
            SettingSchema::number(TEMPERATURE, NumberSpec::celsius(-100.0, 100.0), false),
            SettingValue::Number(0.0),
        ),
        (
            SettingSchema::number(COOL_THRESHOLD, NumberSpec::celsius(10.0, 100.0), true),
            SettingValue::Number(first.t_max),
        ),
        (
            SettingSchema::number(HEAT_THRESHOLD, NumberSpec::celsius(-100.0, 20.0), true),
            SettingValue::Number(first.t_min),
        ),
    ]
}

/// Thermostat node over a pin backend, a state reporter, and an optional
/// telemetry sink.
pub struct ThermostatNode<G, R, S> {
    gpio: G,
    reporter: R,
    channel: Arc<ConfigChannel>,
    forwarder: Option<TelemetryForwarder<S>>,
    rooms: Vec<RoomClimate>,
    chosen: usize,
    band_warned: Vec<bool>,
}

impl<G, R, S> ThermostatNode<G, R, S>
where
    G: GpioPort,
    R: StateReporter,
    S: TelemetrySink,
{
    /// Build the node. `rooms` must be non-empty and match the option codes
    /// registered by [`settings`].
    #[must_use]
    pub fn new(
        gpio: G,
        reporter: R,
        channel: Arc<ConfigChannel>,
        rooms: Vec<RoomClimate>,
        forwarder: Option<TelemetryForwarder<S>>,
    ) -> Self {
        let band_warned = vec![false; rooms.len()];
        Self {
            gpio,
            reporter,
            channel,
            forwarder,
            rooms,
            chosen: 0,
            band_warned,
        }
    }

    /// Pull the channel state into the chosen room, or switch rooms and push
    /// the new room's state back out.
    fn sync_config(&mut self) {
        let selected = self
            .channel
            .code(ROOM)
            .and_then(|code| code.parse::<usize>().ok())
            .filter(|index| *index < self.rooms.len())
            .unwrap_or(self.chosen);

        if selected == self.chosen {
            let room = &mut self.rooms[self.chosen];
            if let Some(mode) = self
                .channel
                .code(MODE)
                .and_then(|code| ThermostatMode::from_code(&code))
            {
                room.mode = mode;
            }
            if let Some(t_max) = self.channel.number(COOL_THRESHOLD) {
                room.t_max = t_max;
            }
            if let Some(t_min) = self.channel.number(HEAT_THRESHOLD) {
                room.t_min = t_min;
            }
        } else {
            // Room switch: the channel now describes the new room, so its
            // stored values are republished rather than read.
            self.chosen = selected;
            let room = &self.rooms[selected];
            tracing::info!(room = %room.name, "room selection changed");
            self.channel
                .publish(MODE, SettingValue::Code(room.mode.code().to_string()));
            self.channel
                .publish(COOL_THRESHOLD, SettingValue::Number(room.t_max));
            self.channel
                .publish(HEAT_THRESHOLD, SettingValue::Number(room.t_min));
        }
    }

    /// Run one room's control cycle; returns the measured temperature.
    async fn service_room(&mut self, index: usize) -> Option<f64> {
        let pins = self.rooms[index].pins;
        let raw = match self.gpio.analog_read(pins.sensor).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(room = %self.rooms[index].name, error = %err, "sensor read failed");
                return None;
            }
        };
        let (low, high) = self.gpio.analog_bounds();
        let temperature = raw_to_celsius(raw, low, high);

        let mode = self.rooms[index].mode;
        if mode == ThermostatMode::Auto {
            if self.rooms[index].band_inverted() {
                if !self.band_warned[index] {
                    self.band_warned[index] = true;
                    tracing::warn!(
                        room = %self.rooms[index].name,
                        t_min = self.rooms[index].t_min,
                        t_max = self.rooms[index].t_max,
                        "heating threshold at or above cooling threshold"
                    );
                }
            } else {
                self.band_warned[index] = false;
            }

            let name = self.rooms[index].name.clone();
            self.write_display(
                pins.display,
                &format!("{name} temp.:\n{temperature:.1} C"),
            )
            .await;
            let events = self.rooms[index].advance(temperature);
            for event in events {
                match event {
                    ClimateEvent::HeatingOn => {
                        self.write_digital(pins.heating, true).await;
                        self.write_display(pins.display, "Heating on").await;
                    }
                    ClimateEvent::HeatingOff => {
                        self.write_digital(pins.heating, false).await;
                        self.write_display(pins.display, "Heating off").await;
                    }
                    ClimateEvent::CoolingOn => {
                        self.write_digital(pins.cooling, true).await;
                        self.write_display(pins.display, "Cooling on").await;
                    }
                    ClimateEvent::CoolingOff => {
                        self.write_digital(pins.cooling, false).await;
                        self.write_display(pins.display, "Cooling off").await;
                    }
                }
            }
        } else {
            // Forced modes rewrite the actuators every poll so a restarted
            // driver converges without waiting for a mode change.
            let (heating, cooling) = self.rooms[index].force(mode);
            self.write_digital(pins.heating, heating).await;
            self.write_digital(pins.cooling, cooling).await;
            self.write_display(pins.display, &mode.to_string()).await;
        }

        Some(temperature)
    }

    async fn write_digital(&self, pin: Pin, level: bool) {
        if let Err(err) = self.gpio.digital_write(pin, level).await {
            tracing::warn!(error = %err, "actuator write failed");
        }
    }

    async fn write_display(&self, pin: Pin, text: &str) {
        if let Err(err) = self.gpio.custom_write(pin, text).await {
            tracing::warn!(error = %err, "display write failed");
        }
    }
}

impl<G, R, S> Node for ThermostatNode<G, R, S>
where
    G: GpioPort,
    R: StateReporter,
    S: TelemetrySink,
{
    fn name(&self) -> &'static str {
        "thermostat"
    }

    async fn poll(&mut self, _now: LocalMoment) {
        self.sync_config();

        let mut chosen_temperature = None;
        for index in 0..self.rooms.len() {
            let temperature = self.service_room(index).await;
            if index == self.chosen {
                chosen_temperature = temperature;
            }
        }

        if let Some(temperature) = chosen_temperature {
            self.channel
                .publish(TEMPERATURE, SettingValue::Number(temperature));
            if let Some(forwarder) = &mut self.forwarder {
                forwarder
                    .push(TemperatureSample::new(temperature, now()))
                    .await;
            }
        }

        if let Err(err) = self.reporter.report_states(&self.channel.snapshot()).await {
            tracing::warn!(error = %err, "state report failed");
        }
    }
}
