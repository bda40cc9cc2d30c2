//! Staged morning orchestration.
//!
//! Fires once per day when the clock reaches `target_hour:00` and sequences
//! heating, a three-stage light ramp, and a single coffee pulse. The trigger
//! minute may be polled any number of times (the poll interval is not assumed
//! to align with it), so every stage transition is idempotent.
//!
//! The daily cycle is a two-phase machine: during the *trigger window* all
//! three branches are serviced in order heating → light → coffee; during the
//! *settling tail* (window closed but work pending) only unfinished heating
//! and light work continue; once both settle, the full daily state resets so
//! the next day starts clean.

use crate::mode::{LampLevel, LampMode, SwitchMode};
use crate::time::LocalMoment;

/// Light ramp stage. Only ever advances forward until the daily reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum MorningStage {
    #[default]
    Idle,
    Dim,
    On,
}

impl MorningStage {
    fn next(self) -> Self {
        match self {
            Self::Idle => Self::Dim,
            Self::Dim | Self::On => Self::On,
        }
    }

    fn level(self) -> LampLevel {
        match self {
            Self::Idle => LampLevel::Off,
            Self::Dim => LampLevel::Dim,
            Self::On => LampLevel::On,
        }
    }
}

/// Per-device mode gates read fresh from the config channel each poll.
#[derive(Debug, Clone, Copy)]
pub struct MorningModes {
    pub heating: SwitchMode,
    pub light: LampMode,
    pub coffee: SwitchMode,
}

/// Actuator work produced by one orchestrator step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MorningOutput {
    /// Heating relay transition, if any.
    pub heating: Option<bool>,
    /// Lamp level to write on a stage promotion, if any.
    pub light: Option<LampLevel>,
    /// Pulse the coffee machine on (fires at most once per day).
    pub coffee_pulse: bool,
    /// The daily state was reset this step (both branches settled).
    pub did_reset: bool,
}

/// Daily orchestration state.
#[derive(Debug, Clone)]
pub struct MorningRoutine {
    /// Hour at which the routine fires (remote-settable).
    pub target_hour: u8,
    /// Heat-up threshold for the morning heating branch (remote-settable).
    pub t_min: f64,
    /// Minimum dwell before a light stage promotes.
    pub stage_dwell_secs: u32,

    pub stage: MorningStage,
    pub stage_elapsed_secs: u32,
    pub heated_already: bool,
    pub is_heating: bool,
    pub coffee_started: bool,
}

impl MorningRoutine {
    #[must_use]
    pub fn new(target_hour: u8, t_min: f64, stage_dwell_secs: u32) -> Self {
        Self {
            target_hour,
            t_min,
            stage_dwell_secs,
            stage: MorningStage::Idle,
            stage_elapsed_secs: 0,
            heated_already: false,
            is_heating: false,
            coffee_started: false,
        }
    }

    /// Whether the trigger condition holds at the given moment.
    #[must_use]
    pub fn triggered(&self, now: LocalMoment) -> bool {
        now.hour == self.target_hour && now.minute == 0
    }

    /// Whether any daily work is still pending after the window closed.
    ///
    /// A ramp mid-flight (`Dim`) or an engaged heater keeps the settling
    /// tail alive; a finished ramp (`On`) counts as settled.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.stage == MorningStage::Dim || self.is_heating
    }

    /// Advance the orchestrator by one tick.
    pub fn advance(
        &mut self,
        now: LocalMoment,
        temperature: f64,
        modes: &MorningModes,
        tick_secs: u32,
    ) -> MorningOutput {
        let mut output = MorningOutput::default();

        if self.triggered(now) {
            if modes.heating == SwitchMode::Auto {
                output.heating = self.heating_step(temperature);
            }
            if modes.light == LampMode::Auto {
                output.light = self.light_step(tick_secs);
            }
            if modes.coffee == SwitchMode::Auto && !self.coffee_started {
                self.coffee_started = true;
                output.coffee_pulse = true;
            }
        } else if self.pending() {
            // Settling tail: finish what the window started, never re-arm
            // coffee.
            if modes.heating == SwitchMode::Auto && !self.heated_already {
                output.heating = self.heating_step(temperature);
            }
            if modes.light == LampMode::Auto && self.stage > MorningStage::Idle {
                output.light = self.light_step(tick_secs);
            }
        } else if self.dirty() {
            self.reset();
            output.did_reset = true;
        }

        output
    }

    /// Heat-only hysteresis rule: engage below `t_min`, release above it,
    /// and once released stay released until the daily reset.
    fn heating_step(&mut self, temperature: f64) -> Option<bool> {
        if temperature < self.t_min && !self.is_heating && !self.heated_already {
            self.is_heating = true;
            Some(true)
        } else if temperature > self.t_min && self.is_heating {
            self.is_heating = false;
            self.heated_already = true;
            Some(false)
        } else {
            None
        }
    }

    /// Promote the light ramp when the current stage has dwelt long enough.
    ///
    /// `Idle` has no dwell and promotes immediately; `On` is terminal until
    /// the daily reset.
    fn light_step(&mut self, tick_secs: u32) -> Option<LampLevel> {
        let mut written = None;
        let promote = self.stage == MorningStage::Idle
            || (self.stage > MorningStage::Idle && self.stage_elapsed_secs >= self.stage_dwell_secs);

        if promote {
            let next = self.stage.next();
            if next != self.stage {
                self.stage = next;
                self.stage_elapsed_secs = 0;
                written = Some(next.level());
            }
        }
        self.stage_elapsed_secs += tick_secs;
        written
    }

    fn dirty(&self) -> bool {
        self.stage != MorningStage::Idle
            || self.stage_elapsed_secs != 0
            || self.heated_already
            || self.is_heating
            || self.coffee_started
    }

    /// Reset the full daily state so the next trigger starts clean.
    pub fn reset(&mut self) {
        self.stage = MorningStage::Idle;
        self.stage_elapsed_secs = 0;
        self.heated_already = false;
        self.is_heating = false;
        self.coffee_started = false;
    }

    /// Clear the heating branch (device left `Auto` mode).
    pub fn reset_heating(&mut self) {
        self.is_heating = false;
        self.heated_already = false;
    }

    /// Clear the light branch (device left `Auto` mode).
    pub fn reset_light(&mut self) {
        self.stage = MorningStage::Idle;
        self.stage_elapsed_secs = 0;
    }

    /// Clear the coffee branch (device left `Auto` mode).
    pub fn reset_coffee(&mut self) {
        self.coffee_started = false;
    }
}
