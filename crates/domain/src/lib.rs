//! # homenode-domain
//!
//! Pure domain model for the homenode automation system.
//!
//! ## Responsibilities
//! - Foundational types: pins, timestamps, hour windows, error conventions
//! - Define the **mode enumerations** each device class exposes remotely
//! - Define the **setting schema** types used by the remote-config channel
//! - Contain the three controller state machines:
//!   - [`climate::RoomClimate`] — hysteresis heating/cooling
//!   - [`light::LightLatch`] — duration-latched occupancy lighting
//!   - [`morning::MorningRoutine`] — staged once-a-day orchestration
//! - Contain the telemetry sample type and the 3-sigma outlier filter
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod climate;
pub mod config;
pub mod error;
pub mod light;
pub mod mode;
pub mod morning;
pub mod pin;
pub mod telemetry;
pub mod time;
