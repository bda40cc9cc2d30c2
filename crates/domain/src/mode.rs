//! Closed mode enumerations per device class.
//!
//! Every mode travels over the remote-config channel as a stable option
//! *code* (`"0"`, `"1"`, …) with a human label, exactly as the device
//! registers it in its schema. Codes never change meaning once published.

macro_rules! define_mode {
    ($(#[doc = $doc:expr])* $name:ident { $($code:literal => $variant:ident),+ $(,)? }) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Stable option code used on the remote-config channel.
            #[must_use]
            pub fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Parse an option code back into a mode.
            #[must_use]
            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Ordered `(code, label)` pairs for schema registration.
            #[must_use]
            pub fn options() -> Vec<(String, String)> {
                vec![$(($code.to_string(), stringify!($variant).to_string()),)+]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str(stringify!($variant)),)+
                }
            }
        }
    };
}

define_mode!(
    /// Thermostat operating mode.
    ThermostatMode {
        "0" => Off,
        "1" => Cooling,
        "2" => Heating,
        "3" => Auto,
    }
);

define_mode!(
    /// Binary-device operating mode (door light, heating relay, coffee machine).
    SwitchMode {
        "0" => Off,
        "1" => On,
        "2" => Auto,
    }
);

define_mode!(
    /// Tri-state lamp operating mode used by the morning routine.
    LampMode {
        "0" => Off,
        "1" => Dim,
        "2" => On,
        "3" => Auto,
    }
);

/// Physical level written to a tri-state lamp through its custom pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LampLevel {
    #[default]
    Off,
    Dim,
    On,
}

impl LampLevel {
    /// Wire code the lamp driver expects on `custom_write`.
    #[must_use]
    pub fn wire_code(self) -> &'static str {
        match self {
            Self::Off => "0",
            Self::Dim => "1",
            Self::On => "2",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_thermostat_modes_through_codes() {
        for mode in [
            ThermostatMode::Off,
            ThermostatMode::Cooling,
            ThermostatMode::Heating,
            ThermostatMode::Auto,
        ] {
            assert_eq!(ThermostatMode::from_code(mode.code()), Some(mode));
        }
    }

    #[test]
    fn should_reject_unknown_codes() {
        assert_eq!(ThermostatMode::from_code("9"), None);
        assert_eq!(SwitchMode::from_code("3"), None);
        assert_eq!(LampMode::from_code("x"), None);
    }

    #[test]
    fn should_list_options_in_code_order() {
        let options = SwitchMode::options();
        assert_eq!(
            options,
            vec![
                ("0".to_string(), "Off".to_string()),
                ("1".to_string(), "On".to_string()),
                ("2".to_string(), "Auto".to_string()),
            ]
        );
    }

    #[test]
    fn should_display_variant_labels() {
        assert_eq!(ThermostatMode::Cooling.to_string(), "Cooling");
        assert_eq!(LampMode::Dim.to_string(), "Dim");
    }

    #[test]
    fn should_order_lamp_levels_off_to_on() {
        assert!(LampLevel::Off < LampLevel::Dim);
        assert!(LampLevel::Dim < LampLevel::On);
    }

    #[test]
    fn should_expose_lamp_wire_codes() {
        assert_eq!(LampLevel::Off.wire_code(), "0");
        assert_eq!(LampLevel::Dim.wire_code(), "1");
        assert_eq!(LampLevel::On.wire_code(), "2");
    }
}
