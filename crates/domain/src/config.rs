//! Typed remote-setting schema.
//!
//! Each device registers an ordered schema describing its settings: options
//! with an enumerated code→label map, or numbers with optional bounds, unit,
//! and linear imperial-conversion formulas. Raw values pushed over the
//! management channel are parsed and validated against this schema exactly
//! once, at the channel boundary; downstream control logic never re-checks
//! types.

use serde::{Deserialize, Serialize};

use crate::error::ConfigRejection;

/// Linear imperial-display conversion metadata for a numeric setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImperialSpec {
    /// Imperial unit label (e.g. `"°F"`).
    pub unit: &'static str,
    /// Formula applied for metric → imperial display (e.g. `"x*1.8+32"`).
    pub to_imperial: &'static str,
    /// Formula applied for imperial → metric input (e.g. `"(x-32)/1.8"`).
    pub to_metric: &'static str,
}

/// Shape of a numeric setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberSpec {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Metric unit label (e.g. `"°C"`).
    pub unit: Option<&'static str>,
    pub imperial: Option<ImperialSpec>,
    pub decimal_digits: Option<u8>,
}

impl NumberSpec {
    /// Unadorned number with no bounds or unit.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            min: None,
            max: None,
            unit: None,
            imperial: None,
            decimal_digits: None,
        }
    }

    /// Number restricted to `min..=max`.
    #[must_use]
    pub fn bounded(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Self::plain()
        }
    }

    /// Celsius temperature with the standard Fahrenheit display conversion.
    #[must_use]
    pub fn celsius(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            unit: Some("°C"),
            imperial: Some(ImperialSpec {
                unit: "°F",
                to_imperial: "x*1.8+32",
                to_metric: "(x-32)/1.8",
            }),
            decimal_digits: Some(1),
        }
    }
}

/// Declared type of a setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SettingKind {
    /// Closed enumeration, transported as its code.
    Options {
        /// Ordered `(code, label)` pairs.
        options: Vec<(String, String)>,
    },
    /// Numeric value.
    Number(NumberSpec),
}

/// One registered setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingSchema {
    pub name: &'static str,
    pub kind: SettingKind,
    /// Whether external writes are accepted for this setting.
    pub controllable: bool,
}

impl SettingSchema {
    #[must_use]
    pub fn options(name: &'static str, options: Vec<(String, String)>, controllable: bool) -> Self {
        Self {
            name,
            kind: SettingKind::Options { options },
            controllable,
        }
    }

    #[must_use]
    pub fn number(name: &'static str, spec: NumberSpec, controllable: bool) -> Self {
        Self {
            name,
            kind: SettingKind::Number(spec),
            controllable,
        }
    }

    /// Parse and validate a raw external value against this setting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigRejection::InvalidValue`] when the raw text does not
    /// parse into the declared type or falls outside its enumeration/range.
    pub fn parse(&self, raw: &str) -> Result<SettingValue, ConfigRejection> {
        let invalid = |reason: &str| ConfigRejection::InvalidValue {
            name: self.name.to_string(),
            value: raw.to_string(),
            reason: reason.to_string(),
        };

        match &self.kind {
            SettingKind::Options { options } => {
                if options.iter().any(|(code, _)| code == raw) {
                    Ok(SettingValue::Code(raw.to_string()))
                } else {
                    Err(invalid("not a known option code"))
                }
            }
            SettingKind::Number(spec) => {
                let value: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| invalid("not a number"))?;
                if !value.is_finite() {
                    return Err(invalid("not a finite number"));
                }
                if spec.min.is_some_and(|min| value < min) {
                    return Err(invalid("below the allowed minimum"));
                }
                if spec.max.is_some_and(|max| value > max) {
                    return Err(invalid("above the allowed maximum"));
                }
                Ok(SettingValue::Number(value))
            }
        }
    }
}

/// A validated setting value.
///
/// Serializes untagged: codes as strings, numbers as numbers — the shape the
/// management transport reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Code(String),
    Number(f64),
}

impl SettingValue {
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Code(code) => Some(code),
            Self::Number(_) => None,
        }
    }

    #[must_use]
    pub fn number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Code(_) => None,
        }
    }
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code(code) => f.write_str(code),
            Self::Number(value) => value.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::ThermostatMode;

    fn mode_setting() -> SettingSchema {
        SettingSchema::options("Mode", ThermostatMode::options(), true)
    }

    fn threshold_setting() -> SettingSchema {
        SettingSchema::number("Auto Cool Temperature", NumberSpec::celsius(10.0, 100.0), true)
    }

    #[test]
    fn should_accept_known_option_code() {
        let value = mode_setting().parse("3").unwrap();
        assert_eq!(value, SettingValue::Code("3".to_string()));
    }

    #[test]
    fn should_reject_unknown_option_code() {
        let err = mode_setting().parse("7").unwrap_err();
        assert!(matches!(err, ConfigRejection::InvalidValue { .. }));
    }

    #[test]
    fn should_accept_number_within_bounds() {
        let value = threshold_setting().parse("25.5").unwrap();
        assert_eq!(value, SettingValue::Number(25.5));
    }

    #[test]
    fn should_reject_number_below_minimum() {
        let err = threshold_setting().parse("5").unwrap_err();
        assert!(matches!(err, ConfigRejection::InvalidValue { .. }));
    }

    #[test]
    fn should_reject_number_above_maximum() {
        assert!(threshold_setting().parse("150").is_err());
    }

    #[test]
    fn should_reject_non_numeric_text() {
        let err = threshold_setting().parse("warm").unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn should_reject_non_finite_numbers() {
        assert!(threshold_setting().parse("inf").is_err());
        assert!(threshold_setting().parse("NaN").is_err());
    }

    #[test]
    fn should_accept_unbounded_number() {
        let setting = SettingSchema::number("Temperature", NumberSpec::plain(), false);
        assert_eq!(
            setting.parse("-42.5").unwrap(),
            SettingValue::Number(-42.5)
        );
    }

    #[test]
    fn should_serialize_values_untagged() {
        let code = serde_json::to_string(&SettingValue::Code("2".to_string())).unwrap();
        assert_eq!(code, "\"2\"");
        let number = serde_json::to_string(&SettingValue::Number(21.5)).unwrap();
        assert_eq!(number, "21.5");
    }

    #[test]
    fn should_carry_imperial_conversion_metadata() {
        let SettingKind::Number(spec) = threshold_setting().kind else {
            panic!("expected a number setting");
        };
        let imperial = spec.imperial.unwrap();
        assert_eq!(imperial.to_imperial, "x*1.8+32");
        assert_eq!(imperial.to_metric, "(x-32)/1.8");
    }
}
