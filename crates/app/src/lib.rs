//! # homenode-app
//!
//! Application layer — the automation nodes and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound):
//!   - [`ports::GpioPort`] — sensor reads and actuator writes
//!   - [`ports::StateReporter`] — push a full state snapshot per poll
//!   - [`ports::TelemetrySink`] — deliver temperature samples
//! - Provide the [`config_channel::ConfigChannel`] — the shared store of
//!   named, typed settings mutated concurrently by the management transport
//! - Provide the [`scheduler`] — an explicit tick source so control logic is
//!   tested with synthetic moments instead of real sleeps
//! - Provide the three automation [`nodes`] that orchestrate one poll cycle
//!   each: sense → decide → actuate → report
//! - Provide the best-effort batching [`telemetry_forwarder`]
//!
//! ## Dependency rule
//! Depends on `homenode-domain` only (plus `tokio` for time and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod config_channel;
pub mod nodes;
pub mod ports;
pub mod scheduler;
pub mod telemetry_forwarder;
