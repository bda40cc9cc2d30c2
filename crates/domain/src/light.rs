//! Duration-latched occupancy lighting.
//!
//! A motion or door trigger inside the allowed hour window latches the light
//! on; the latch then holds for at least `duration_secs` of elapsed ticks,
//! re-arming from zero on every new trigger.

use crate::mode::LampLevel;
use crate::time::HourWindow;

/// Latch state for the door light.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightLatch {
    pub is_lit: bool,
    /// Seconds the light has been on since the last trigger.
    /// Resets to 0 on every `is_lit` flip.
    pub elapsed_on_secs: u32,
    /// Hour window in which triggers are honored (may wrap midnight).
    pub window: HourWindow,
    /// Minimum on-time after a trigger.
    pub duration_secs: u32,
}

impl LightLatch {
    #[must_use]
    pub fn new(window: HourWindow, duration_secs: u32) -> Self {
        Self {
            is_lit: false,
            elapsed_on_secs: 0,
            window,
            duration_secs,
        }
    }

    /// Reset to the initial (unlit) state. Used when the device leaves
    /// `Auto` mode.
    pub fn reset(&mut self) {
        self.is_lit = false;
        self.elapsed_on_secs = 0;
    }

    /// Advance the latch by one tick and return the level to write.
    ///
    /// The caller writes the returned level unconditionally every tick,
    /// whether or not it changed, so a restarted lamp driver converges back
    /// to the correct physical state.
    pub fn tick(&mut self, hour: u8, occupancy: bool, door: bool, tick_secs: u32) -> LampLevel {
        if self.window.contains(hour) && (occupancy || door) {
            self.is_lit = true;
            self.elapsed_on_secs = 0;
        } else if self.is_lit && self.elapsed_on_secs >= self.duration_secs {
            self.is_lit = false;
            self.elapsed_on_secs = 0;
        } else if self.is_lit {
            self.elapsed_on_secs += tick_secs;
        }

        if self.is_lit { LampLevel::On } else { LampLevel::Off }
    }
}
