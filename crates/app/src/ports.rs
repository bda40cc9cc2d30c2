//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside
//! world. They are defined here (in `app`) so that both the node layer and
//! the adapter layer can depend on them without creating circular
//! dependencies.

pub mod gpio;
pub mod reporter;
pub mod telemetry;

pub use gpio::GpioPort;
pub use reporter::StateReporter;
pub use telemetry::TelemetrySink;
