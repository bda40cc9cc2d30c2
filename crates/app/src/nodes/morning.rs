//! Morning routine node.
//!
//! Orchestrates three devices once per day: pre-heats the room, ramps the
//! lamp off → dim → on, and pulses the coffee machine. Each branch can be
//! forced out of `Auto` independently; a forced branch is written every poll
//! and its orchestrator state is cleared on the mode change.

use std::sync::Arc;

use homenode_domain::config::{NumberSpec, SettingSchema, SettingValue};
use homenode_domain::mode::{LampLevel, LampMode, SwitchMode};
use homenode_domain::morning::{MorningModes, MorningRoutine};
use homenode_domain::pin::{AnalogPin, Pin, raw_to_celsius};
use homenode_domain::time::LocalMoment;

use crate::config_channel::ConfigChannel;
use crate::ports::{GpioPort, StateReporter};
use crate::scheduler::Node;

const MORNING_HOUR: &str = "Morning Hour";
const CURRENT_HOUR: &str = "Current Hour";
const HEATING_MODE: &str = "Heating Mode";
const CURRENT_TEMPERATURE: &str = "Current Temperature";
const HEAT_THRESHOLD: &str = "Auto Heat Temperature";
const COFFEE_MODE: &str = "Coffee Machine Mode";
const LIGHT_MODE: &str = "Light Mode";

/// Pin assignment for the morning routine.
#[derive(Debug, Clone, Copy)]
pub struct MorningPins {
    /// Coffee machine, custom protocol, `"1"` starts a brew.
    pub coffee: Pin,
    /// Tri-state lamp, custom protocol.
    pub light: Pin,
    /// Heating relay, digital.
    pub heating: Pin,
    /// Room temperature sensor.
    pub sensor: AnalogPin,
}

/// Settings registered by a morning routine with the given startup state.
#[must_use]
pub fn settings(routine: &MorningRoutine) -> Vec<(SettingSchema, SettingValue)> {
    vec![
        (
            SettingSchema::number(MORNING_HOUR, NumberSpec::bounded(0.0, 23.0), true),
            SettingValue::Number(f64::from(routine.target_hour)),
        ),
        (
            SettingSchema::number(CURRENT_HOUR, NumberSpec::bounded(0.0, 23.0), false),
            SettingValue::Number(0.0),
        ),
        (
            SettingSchema::options(HEATING_MODE, SwitchMode::options(), true),
            SettingValue::Code(SwitchMode::Auto.code().to_string()),
        ),
        (
            SettingSchema::number(CURRENT_TEMPERATURE, NumberSpec::celsius(-100.0, 100.0), false),
            SettingValue::Number(0.0),
        ),
        (
            SettingSchema::number(HEAT_THRESHOLD, NumberSpec::celsius(-100.0, 35.0), true),
            SettingValue::Number(routine.t_min),
        ),
        (
            SettingSchema::options(COFFEE_MODE, SwitchMode::options(), true),
            SettingValue::Code(SwitchMode::Auto.code().to_string()),
        ),
        (
            SettingSchema::options(LIGHT_MODE, LampMode::options(), true),
            SettingValue::Code(LampMode::Auto.code().to_string()),
        ),
    ]
}

/// Morning routine node over a pin backend and a state reporter.
pub struct MorningRoutineNode<G, R> {
    gpio: G,
    reporter: R,
    channel: Arc<ConfigChannel>,
    pins: MorningPins,
    routine: MorningRoutine,
    last: MorningModes,
    tick_secs: u32,
}

impl<G, R> MorningRoutineNode<G, R>
where
    G: GpioPort,
    R: StateReporter,
{
    #[must_use]
    pub fn new(
        gpio: G,
        reporter: R,
        channel: Arc<ConfigChannel>,
        pins: MorningPins,
        routine: MorningRoutine,
        tick_secs: u32,
    ) -> Self {
        Self {
            gpio,
            reporter,
            channel,
            pins,
            routine,
            last: MorningModes {
                heating: SwitchMode::Auto,
                light: LampMode::Auto,
                coffee: SwitchMode::Auto,
            },
            tick_secs,
        }
    }

    /// Read the modes and parameters fresh, clearing orchestrator branches
    /// whose device just left `Auto`.
    fn sync_config(&mut self) -> MorningModes {
        if let Some(hour) = self.channel.number(MORNING_HOUR) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                self.routine.target_hour = hour.clamp(0.0, 23.0) as u8;
            }
        }
        if let Some(t_min) = self.channel.number(HEAT_THRESHOLD) {
            self.routine.t_min = t_min;
        }

        let modes = MorningModes {
            heating: self.mode_of(HEATING_MODE, self.last.heating),
            light: self
                .channel
                .code(LIGHT_MODE)
                .and_then(|code| LampMode::from_code(&code))
                .unwrap_or(self.last.light),
            coffee: self.mode_of(COFFEE_MODE, self.last.coffee),
        };

        if modes.heating != self.last.heating && modes.heating != SwitchMode::Auto {
            self.routine.reset_heating();
        }
        if modes.light != self.last.light && modes.light != LampMode::Auto {
            self.routine.reset_light();
        }
        if modes.coffee != self.last.coffee && modes.coffee != SwitchMode::Auto {
            self.routine.reset_coffee();
        }
        self.last = modes;
        modes
    }

    fn mode_of(&self, name: &str, fallback: SwitchMode) -> SwitchMode {
        self.channel
            .code(name)
            .and_then(|code| SwitchMode::from_code(&code))
            .unwrap_or(fallback)
    }

    async fn write_heating(&self, level: bool) {
        if let Err(err) = self.gpio.digital_write(self.pins.heating, level).await {
            tracing::warn!(error = %err, "heating write failed");
        }
    }

    async fn write_light(&self, level: LampLevel) {
        if let Err(err) = self.gpio.custom_write(self.pins.light, level.wire_code()).await {
            tracing::warn!(error = %err, "lamp write failed");
        }
    }

    async fn write_coffee(&self, brewing: bool) {
        let code = if brewing { "1" } else { "0" };
        if let Err(err) = self.gpio.custom_write(self.pins.coffee, code).await {
            tracing::warn!(error = %err, "coffee machine write failed");
        }
    }
}

impl<G, R> Node for MorningRoutineNode<G, R>
where
    G: GpioPort,
    R: StateReporter,
{
    fn name(&self) -> &'static str {
        "morning-routine"
    }

    async fn poll(&mut self, now: LocalMoment) {
        self.channel
            .publish(CURRENT_HOUR, SettingValue::Number(f64::from(now.hour)));

        let modes = self.sync_config();

        // Forced branches are rewritten every poll.
        match modes.heating {
            SwitchMode::Off => self.write_heating(false).await,
            SwitchMode::On => self.write_heating(true).await,
            SwitchMode::Auto => {}
        }
        match modes.light {
            LampMode::Off => self.write_light(LampLevel::Off).await,
            LampMode::Dim => self.write_light(LampLevel::Dim).await,
            LampMode::On => self.write_light(LampLevel::On).await,
            LampMode::Auto => {}
        }
        match modes.coffee {
            SwitchMode::Off => self.write_coffee(false).await,
            SwitchMode::On => self.write_coffee(true).await,
            SwitchMode::Auto => {}
        }

        match self.gpio.analog_read(self.pins.sensor).await {
            Ok(raw) => {
                let (low, high) = self.gpio.analog_bounds();
                let temperature = raw_to_celsius(raw, low, high);
                self.channel
                    .publish(CURRENT_TEMPERATURE, SettingValue::Number(temperature));

                let output = self
                    .routine
                    .advance(now, temperature, &modes, self.tick_secs);
                if let Some(level) = output.heating {
                    tracing::info!(engaged = level, "morning heating transition");
                    self.write_heating(level).await;
                }
                if let Some(level) = output.light {
                    self.write_light(level).await;
                }
                if output.coffee_pulse {
                    tracing::info!("starting coffee machine");
                    self.write_coffee(true).await;
                }
                if output.did_reset {
                    tracing::debug!("daily state reset");
                }
            }
            Err(err) => {
                // Without a temperature the orchestrator cannot step safely;
                // skip this cycle and leave the actuators as they are.
                tracing::warn!(error = %err, "sensor read failed");
            }
        }

        if let Err(err) = self.reporter.report_states(&self.channel.snapshot()).await {
            tracing::warn!(error = %err, "state report failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use homenode_domain::morning::MorningStage;

    use super::*;
    use crate::nodes::harness::{FakeBoard, RecordingReporter};

    const PINS: MorningPins = MorningPins {
        coffee: Pin(0),
        light: Pin(1),
        heating: Pin(2),
        sensor: AnalogPin(0),
    };

    const DWELL: u32 = 10;

    fn node<'a>(
        board: &'a FakeBoard,
        reporter: &'a RecordingReporter,
    ) -> (
        MorningRoutineNode<&'a FakeBoard, &'a RecordingReporter>,
        Arc<ConfigChannel>,
    ) {
        let routine = MorningRoutine::new(7, 21.0, DWELL);
        let channel = Arc::new(ConfigChannel::new(settings(&routine)));
        let node = MorningRoutineNode::new(board, reporter, Arc::clone(&channel), PINS, routine, 1);
        (node, channel)
    }

    #[tokio::test]
    async fn should_start_all_three_branches_at_trigger() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, _channel) = node(&board, &reporter);
        board.set_celsius(PINS.sensor, 18.0);

        node.poll(LocalMoment::new(7, 0)).await;

        assert_eq!(board.digital_history(PINS.heating), vec![true]);
        assert_eq!(board.custom_history(PINS.light), vec!["1"]);
        assert_eq!(board.custom_history(PINS.coffee), vec!["1"]);
    }

    #[tokio::test]
    async fn should_do_nothing_outside_trigger_when_idle() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, _channel) = node(&board, &reporter);
        board.set_celsius(PINS.sensor, 18.0);

        node.poll(LocalMoment::new(12, 30)).await;

        assert!(board.writes().is_empty());
    }

    #[tokio::test]
    async fn should_ramp_light_to_full_after_dwell() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, _channel) = node(&board, &reporter);
        board.set_celsius(PINS.sensor, 23.0);

        for _ in 0..=DWELL {
            node.poll(LocalMoment::new(7, 0)).await;
        }

        assert_eq!(board.custom_history(PINS.light), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn should_release_heating_in_settling_tail() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, _channel) = node(&board, &reporter);

        board.set_celsius(PINS.sensor, 18.0);
        node.poll(LocalMoment::new(7, 0)).await;
        // Warm after the window: the tail releases heating once.
        board.set_celsius(PINS.sensor, 23.0);
        node.poll(LocalMoment::new(7, 5)).await;
        node.poll(LocalMoment::new(7, 6)).await;

        assert_eq!(board.digital_history(PINS.heating), vec![true, false]);
    }

    #[tokio::test]
    async fn should_publish_hour_and_temperature() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, channel) = node(&board, &reporter);
        board.set_celsius(PINS.sensor, 19.0);

        node.poll(LocalMoment::new(9, 15)).await;

        assert_eq!(channel.number(CURRENT_HOUR), Some(9.0));
        let temperature = channel.number(CURRENT_TEMPERATURE).unwrap();
        assert!((temperature - 19.0).abs() < 0.2);
    }

    #[tokio::test]
    async fn should_force_branch_every_poll_and_clear_its_state() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, channel) = node(&board, &reporter);

        // Routine is mid-flight: heating engaged at the trigger.
        board.set_celsius(PINS.sensor, 18.0);
        node.poll(LocalMoment::new(7, 0)).await;
        assert!(node.routine.is_heating);

        channel.set(HEATING_MODE, SwitchMode::Off.code()).unwrap();
        node.poll(LocalMoment::new(7, 0)).await;
        node.poll(LocalMoment::new(7, 0)).await;

        assert!(!node.routine.is_heating);
        assert_eq!(
            board.digital_history(PINS.heating),
            vec![true, false, false]
        );
    }

    #[tokio::test]
    async fn should_keep_auto_branches_running_when_one_is_forced() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, channel) = node(&board, &reporter);
        board.set_celsius(PINS.sensor, 23.0);

        channel.set(LIGHT_MODE, LampMode::On.code()).unwrap();
        node.poll(LocalMoment::new(7, 0)).await;

        // Lamp follows the forced mode; coffee still pulses from Auto.
        assert_eq!(board.custom_history(PINS.light), vec!["2"]);
        assert_eq!(board.custom_history(PINS.coffee), vec!["1"]);
        assert_eq!(node.routine.stage, MorningStage::Idle);
    }

    #[tokio::test]
    async fn should_honor_remotely_moved_morning_hour() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, channel) = node(&board, &reporter);
        board.set_celsius(PINS.sensor, 23.0);

        channel.set(MORNING_HOUR, "5").unwrap();
        node.poll(LocalMoment::new(7, 0)).await;
        assert!(board.custom_history(PINS.coffee).is_empty());

        node.poll(LocalMoment::new(5, 0)).await;
        assert_eq!(board.custom_history(PINS.coffee), vec!["1"]);
    }

    #[tokio::test]
    async fn should_skip_cycle_on_sensor_failure_but_still_report() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, _channel) = node(&board, &reporter);
        // No scripted sensor value.

        node.poll(LocalMoment::new(7, 0)).await;

        assert!(board.writes().is_empty());
        assert_eq!(reporter.reports.lock().unwrap().len(), 1);
        // The trigger work was not consumed: the next healthy poll in the
        // window still runs it.
        board.set_celsius(PINS.sensor, 23.0);
        node.poll(LocalMoment::new(7, 0)).await;
        assert_eq!(board.custom_history(PINS.coffee), vec!["1"]);
    }

    #[test]
    fn should_register_settings_with_startup_values() {
        let routine = MorningRoutine::new(7, 21.0, DWELL);
        let channel = ConfigChannel::new(settings(&routine));
        assert_eq!(channel.number(MORNING_HOUR), Some(7.0));
        assert_eq!(channel.number(HEAT_THRESHOLD), Some(21.0));
        assert_eq!(channel.code(HEATING_MODE).as_deref(), Some("2"));
        assert_eq!(channel.code(LIGHT_MODE).as_deref(), Some("3"));
        assert_eq!(channel.schema().count(), 7);
    }
}
