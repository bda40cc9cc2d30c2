//! Hysteresis climate control — one state machine per room.
//!
//! The controller keeps a dead-band `[t_min, t_max]` between the heating and
//! cooling thresholds so that samples strictly inside the band, once the room
//! has settled, never toggle an actuator (no chatter at the boundary).

use crate::mode::ThermostatMode;
use crate::pin::{AnalogPin, Pin};

/// Which actuator the room currently has engaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClimateState {
    /// Neither actuator engaged.
    #[default]
    Idle,
    Heating,
    Cooling,
}

/// An actuator transition produced by one evaluation of the control law.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimateEvent {
    HeatingOn,
    HeatingOff,
    CoolingOn,
    CoolingOff,
}

/// Pin assignment for one room.
#[derive(Debug, Clone, Copy)]
pub struct RoomPins {
    pub heating: Pin,
    pub cooling: Pin,
    pub display: Pin,
    pub sensor: AnalogPin,
}

/// Climate state for a single room.
///
/// Created at node startup with both actuators disengaged; mutated only by
/// [`advance`](Self::advance) and [`force`](Self::force); lives for the whole
/// node lifetime.
#[derive(Debug, Clone)]
pub struct RoomClimate {
    pub name: String,
    pub pins: RoomPins,
    pub state: ClimateState,
    /// Below this the room heats (remote-settable).
    pub t_min: f64,
    /// Above this the room cools (remote-settable).
    pub t_max: f64,
    pub mode: ThermostatMode,
}

impl RoomClimate {
    #[must_use]
    pub fn new(name: impl Into<String>, pins: RoomPins, t_min: f64, t_max: f64) -> Self {
        Self {
            name: name.into(),
            pins,
            state: ClimateState::Idle,
            t_min,
            t_max,
            mode: ThermostatMode::Auto,
        }
    }

    #[must_use]
    pub fn is_heating(&self) -> bool {
        self.state == ClimateState::Heating
    }

    #[must_use]
    pub fn is_cooling(&self) -> bool {
        self.state == ClimateState::Cooling
    }

    /// Evaluate the hysteresis rule for one temperature sample (`Auto` mode).
    ///
    /// Returns the actuator transitions to issue this poll, in order. An
    /// empty result means the sample landed inside the settled band and
    /// nothing must be written.
    pub fn advance(&mut self, temperature: f64) -> Vec<ClimateEvent> {
        let mut events = Vec::new();

        if temperature < self.t_min && self.state != ClimateState::Heating {
            if self.state == ClimateState::Cooling {
                events.push(ClimateEvent::CoolingOff);
            }
            events.push(ClimateEvent::HeatingOn);
            self.state = ClimateState::Heating;
        } else if temperature > self.t_min && self.state == ClimateState::Heating {
            events.push(ClimateEvent::HeatingOff);
            self.state = ClimateState::Idle;
        }

        if temperature > self.t_max && self.state != ClimateState::Cooling {
            if self.state == ClimateState::Heating {
                events.push(ClimateEvent::HeatingOff);
            }
            events.push(ClimateEvent::CoolingOn);
            self.state = ClimateState::Cooling;
        } else if temperature < self.t_max && self.state == ClimateState::Cooling {
            events.push(ClimateEvent::CoolingOff);
            self.state = ClimateState::Idle;
        }

        events
    }

    /// Apply a forced (non-`Auto`) mode, bypassing the state machine.
    ///
    /// Returns the `(heating, cooling)` levels to write. The write is issued
    /// by the caller every poll regardless of change, so a restarted actuator
    /// driver self-heals to the correct physical state.
    pub fn force(&mut self, mode: ThermostatMode) -> (bool, bool) {
        match mode {
            ThermostatMode::Off | ThermostatMode::Auto => {
                self.state = ClimateState::Idle;
                (false, false)
            }
            ThermostatMode::Heating => {
                self.state = ClimateState::Heating;
                (true, false)
            }
            ThermostatMode::Cooling => {
                self.state = ClimateState::Cooling;
                (false, true)
            }
        }
    }

    /// Whether the configured band is inverted (`t_min >= t_max`).
    ///
    /// The thresholds are independently remote-settable and deliberately not
    /// cross-validated; an inverted band is observable, not corrected.
    #[must_use]
    pub fn band_inverted(&self) -> bool {
        self.t_min >= self.t_max
    }
}
