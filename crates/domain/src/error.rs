//! Common error types used across the workspace.
//!
//! Each failure class carries a typed error; layers convert via `#[from]`
//! where they wrap one another. None of these are fatal inside a poll loop:
//! nodes log them and continue with the next cycle.

/// A remote-config write that was refused at the channel boundary.
///
/// Refusals are reported-but-non-fatal: the channel logs them and leaves
/// the stored value unchanged.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigRejection {
    /// No setting with this name is registered in the schema.
    #[error("unknown setting `{name}`")]
    UnknownSetting { name: String },
    /// The setting exists but is not externally controllable.
    #[error("setting `{name}` is not remotely controllable")]
    NotControllable { name: String },
    /// The raw value does not parse into the setting's declared type,
    /// or falls outside its enumeration/range.
    #[error("invalid value `{value}` for setting `{name}`: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

/// A sensor or actuator operation that failed at the pin boundary.
#[derive(Debug, thiserror::Error)]
#[error("{op} on pin {pin} failed: {message}")]
pub struct PortError {
    /// Raw pin number the operation addressed.
    pub pin: u16,
    /// Operation name (`analog_read`, `digital_write`, …).
    pub op: &'static str,
    pub message: String,
}

impl PortError {
    #[must_use]
    pub fn new(pin: u16, op: &'static str, message: impl Into<String>) -> Self {
        Self {
            pin,
            op,
            message: message.into(),
        }
    }
}

/// Failure to push a state snapshot to the management transport.
#[derive(Debug, thiserror::Error)]
#[error("state report failed: {message}")]
pub struct ReportError {
    pub message: String,
}

impl ReportError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure to deliver telemetry to the collection endpoint.
///
/// Delivery is best-effort: the forwarder logs this and drops the batch.
#[derive(Debug, thiserror::Error)]
#[error("telemetry delivery failed: {message}")]
pub struct TelemetryError {
    pub message: String,
}

impl TelemetryError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_unknown_setting_with_name() {
        let err = ConfigRejection::UnknownSetting {
            name: "Mood".to_string(),
        };
        assert_eq!(err.to_string(), "unknown setting `Mood`");
    }

    #[test]
    fn should_render_invalid_value_with_reason() {
        let err = ConfigRejection::InvalidValue {
            name: "Mode".to_string(),
            value: "9".to_string(),
            reason: "not a known option code".to_string(),
        };
        assert!(err.to_string().contains("`9`"));
        assert!(err.to_string().contains("not a known option code"));
    }

    #[test]
    fn should_render_port_error_with_pin_and_op() {
        let err = PortError::new(3, "digital_write", "driver offline");
        assert_eq!(
            err.to_string(),
            "digital_write on pin 3 failed: driver offline"
        );
    }
}
