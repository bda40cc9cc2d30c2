//! Door light node.
//!
//! Motion or an opening door inside the configured night window latches the
//! lamp on for a configurable hold time. Outside `Auto` mode the lamp simply
//! follows the forced mode, and the latch restarts clean when `Auto` is
//! re-entered.

use std::sync::Arc;

use homenode_domain::config::{NumberSpec, SettingSchema, SettingValue};
use homenode_domain::light::LightLatch;
use homenode_domain::mode::{LampLevel, SwitchMode};
use homenode_domain::pin::Pin;
use homenode_domain::time::{HourWindow, LocalMoment};

use crate::config_channel::ConfigChannel;
use crate::ports::{GpioPort, StateReporter};
use crate::scheduler::Node;

const MODE: &str = "Mode";
const CURRENT_HOUR: &str = "Current Hour";
const START_HOUR: &str = "Auto Start Hour";
const END_HOUR: &str = "Auto End Hour";
const DURATION: &str = "Auto Duration";

/// Pin assignment for the door light.
#[derive(Debug, Clone, Copy)]
pub struct DoorLightPins {
    /// Lamp, driven through its custom protocol.
    pub light: Pin,
    /// Motion detector, digital.
    pub motion: Pin,
    /// Door sensor, custom protocol; the first character is the open flag.
    pub door: Pin,
}

/// Settings registered by a door light with the given startup latch.
#[must_use]
pub fn settings(latch: &LightLatch) -> Vec<(SettingSchema, SettingValue)> {
    vec![
        (
            SettingSchema::options(MODE, SwitchMode::options(), true),
            SettingValue::Code(SwitchMode::Auto.code().to_string()),
        ),
        (
            SettingSchema::number(CURRENT_HOUR, NumberSpec::bounded(0.0, 23.0), false),
            SettingValue::Number(0.0),
        ),
        (
            SettingSchema::number(START_HOUR, NumberSpec::bounded(12.0, 23.0), true),
            SettingValue::Number(f64::from(latch.window.start_hour)),
        ),
        (
            SettingSchema::number(END_HOUR, NumberSpec::bounded(0.0, 11.0), true),
            SettingValue::Number(f64::from(latch.window.end_hour)),
        ),
        (
            SettingSchema::number(DURATION, NumberSpec::bounded(1.0, 43200.0), true),
            SettingValue::Number(f64::from(latch.duration_secs)),
        ),
    ]
}

/// Door light node over a pin backend and a state reporter.
pub struct DoorLightNode<G, R> {
    gpio: G,
    reporter: R,
    channel: Arc<ConfigChannel>,
    pins: DoorLightPins,
    latch: LightLatch,
    last_mode: SwitchMode,
    tick_secs: u32,
}

impl<G, R> DoorLightNode<G, R>
where
    G: GpioPort,
    R: StateReporter,
{
    #[must_use]
    pub fn new(
        gpio: G,
        reporter: R,
        channel: Arc<ConfigChannel>,
        pins: DoorLightPins,
        latch: LightLatch,
        tick_secs: u32,
    ) -> Self {
        Self {
            gpio,
            reporter,
            channel,
            pins,
            latch,
            last_mode: SwitchMode::Auto,
            tick_secs,
        }
    }

    fn sync_config(&mut self) -> SwitchMode {
        let mode = self
            .channel
            .code(MODE)
            .and_then(|code| SwitchMode::from_code(&code))
            .unwrap_or(self.last_mode);

        if let Some(start) = self.channel.number(START_HOUR) {
            self.latch.window = HourWindow::new(as_hour(start), self.latch.window.end_hour);
        }
        if let Some(end) = self.channel.number(END_HOUR) {
            self.latch.window = HourWindow::new(self.latch.window.start_hour, as_hour(end));
        }
        if let Some(duration) = self.channel.number(DURATION) {
            self.latch.duration_secs = as_secs(duration);
        }

        mode
    }

    async fn write_light(&self, level: LampLevel) {
        if let Err(err) = self.gpio.custom_write(self.pins.light, level.wire_code()).await {
            tracing::warn!(error = %err, "lamp write failed");
        }
    }
}

/// Whether a door sensor reading means "open": a non-`'0'` leading digit.
fn door_open(reading: &str) -> bool {
    reading
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() && c != '0')
}

fn as_hour(value: f64) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        value.clamp(0.0, 23.0) as u8
    }
}

fn as_secs(value: f64) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        value.max(0.0) as u32
    }
}

impl<G, R> Node for DoorLightNode<G, R>
where
    G: GpioPort,
    R: StateReporter,
{
    fn name(&self) -> &'static str {
        "door-light"
    }

    async fn poll(&mut self, now: LocalMoment) {
        self.channel
            .publish(CURRENT_HOUR, SettingValue::Number(f64::from(now.hour)));

        let mode = self.sync_config();
        if mode != self.last_mode {
            // Any mode change restarts the hold from scratch.
            self.latch.reset();
        }
        self.last_mode = mode;

        match mode {
            SwitchMode::Off => self.write_light(LampLevel::Off).await,
            SwitchMode::On => self.write_light(LampLevel::On).await,
            SwitchMode::Auto => {
                let occupancy = match self.gpio.digital_read(self.pins.motion).await {
                    Ok(level) => level,
                    Err(err) => {
                        tracing::warn!(error = %err, "motion read failed");
                        false
                    }
                };
                let door = match self.gpio.custom_read(self.pins.door).await {
                    Ok(reading) => door_open(&reading),
                    Err(err) => {
                        tracing::warn!(error = %err, "door read failed");
                        false
                    }
                };
                let level = self.latch.tick(now.hour, occupancy, door, self.tick_secs);
                self.write_light(level).await;
            }
        }

        if let Err(err) = self.reporter.report_states(&self.channel.snapshot()).await {
            tracing::warn!(error = %err, "state report failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::harness::{FakeBoard, RecordingReporter};

    const PINS: DoorLightPins = DoorLightPins {
        light: Pin(0),
        motion: Pin(1),
        door: Pin(2),
    };

    fn node<'a>(
        board: &'a FakeBoard,
        reporter: &'a RecordingReporter,
    ) -> (
        DoorLightNode<&'a FakeBoard, &'a RecordingReporter>,
        Arc<ConfigChannel>,
    ) {
        let latch = LightLatch::new(HourWindow::new(20, 8), 15);
        let channel = Arc::new(ConfigChannel::new(settings(&latch)));
        let node = DoorLightNode::new(board, reporter, Arc::clone(&channel), PINS, latch, 1);
        (node, channel)
    }

    #[tokio::test]
    async fn should_light_on_motion_inside_window() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, _channel) = node(&board, &reporter);
        board.set_digital(PINS.motion, true);

        node.poll(LocalMoment::new(22, 0)).await;

        assert_eq!(board.custom_history(PINS.light), vec!["2"]);
    }

    #[tokio::test]
    async fn should_light_on_door_open_inside_window() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, _channel) = node(&board, &reporter);
        board.set_custom(PINS.door, "1");

        node.poll(LocalMoment::new(7, 30)).await;

        assert_eq!(board.custom_history(PINS.light), vec!["2"]);
    }

    #[tokio::test]
    async fn should_stay_dark_on_trigger_outside_window() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, _channel) = node(&board, &reporter);
        board.set_digital(PINS.motion, true);

        node.poll(LocalMoment::new(14, 0)).await;

        // The level is still written every tick, just off.
        assert_eq!(board.custom_history(PINS.light), vec!["0"]);
    }

    #[tokio::test]
    async fn should_hold_for_configured_duration_then_release() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, channel) = node(&board, &reporter);
        channel.set(DURATION, "3").unwrap();

        board.set_digital(PINS.motion, true);
        node.poll(LocalMoment::new(22, 0)).await;
        board.set_digital(PINS.motion, false);
        for _ in 0..5 {
            node.poll(LocalMoment::new(22, 0)).await;
        }

        assert_eq!(
            board.custom_history(PINS.light),
            vec!["2", "2", "2", "2", "0", "0"]
        );
    }

    #[tokio::test]
    async fn should_follow_forced_modes_and_publish_hour() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, channel) = node(&board, &reporter);

        channel.set(MODE, SwitchMode::On.code()).unwrap();
        node.poll(LocalMoment::new(14, 0)).await;
        channel.set(MODE, SwitchMode::Off.code()).unwrap();
        node.poll(LocalMoment::new(15, 0)).await;

        assert_eq!(board.custom_history(PINS.light), vec!["2", "0"]);
        assert_eq!(channel.number(CURRENT_HOUR), Some(15.0));
    }

    #[tokio::test]
    async fn should_restart_latch_when_reentering_auto() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, channel) = node(&board, &reporter);
        channel.set(DURATION, "3").unwrap();

        // Latch on, then leave Auto mid-hold.
        board.set_digital(PINS.motion, true);
        node.poll(LocalMoment::new(22, 0)).await;
        board.set_digital(PINS.motion, false);
        channel.set(MODE, SwitchMode::Off.code()).unwrap();
        node.poll(LocalMoment::new(22, 0)).await;

        // Back to Auto: no residual hold, the lamp stays off without a new
        // trigger.
        channel.set(MODE, SwitchMode::Auto.code()).unwrap();
        node.poll(LocalMoment::new(22, 0)).await;
        assert_eq!(board.custom_history(PINS.light), vec!["2", "0", "0"]);
    }

    #[tokio::test]
    async fn should_honor_remotely_updated_window() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, channel) = node(&board, &reporter);
        board.set_digital(PINS.motion, true);

        // 14:00 is outside the default 20→8 window but inside 13→2.
        node.poll(LocalMoment::new(14, 0)).await;
        channel.set(START_HOUR, "13").unwrap();
        channel.set(END_HOUR, "2").unwrap();
        node.poll(LocalMoment::new(14, 0)).await;

        assert_eq!(board.custom_history(PINS.light), vec!["0", "2"]);
    }

    #[tokio::test]
    async fn should_treat_sensor_failure_as_no_trigger() {
        let board = FakeBoard::default();
        let reporter = RecordingReporter::default();
        let (mut node, _channel) = node(&board, &reporter);
        // Door reading present but closed, motion unset (reads false).
        board.set_custom(PINS.door, "0");

        node.poll(LocalMoment::new(22, 0)).await;

        assert_eq!(board.custom_history(PINS.light), vec!["0"]);
        assert_eq!(reporter.reports.lock().unwrap().len(), 1);
    }

    #[test]
    fn should_parse_door_reading_first_character() {
        assert!(door_open("1"));
        assert!(door_open("2-extra"));
        assert!(!door_open("0"));
        assert!(!door_open("01"));
        assert!(!door_open(""));
        assert!(!door_open("x1"));
    }
}
