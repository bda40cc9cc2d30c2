//! The remote-configuration channel.
//!
//! A channel holds one device's registered settings: an ordered schema plus
//! one independently locked value slot per field. The management transport
//! calls [`set`](ConfigChannel::set) from its own task at any time; the
//! owning node reads typed values at the top of every poll and publishes its
//! live readings before snapshotting.
//!
//! Consistency contract: per-field last-write-wins only. Two `set` calls
//! landing back-to-back mid-cycle may be observed half-applied by a
//! concurrent [`snapshot`](ConfigChannel::snapshot). Callers needing atomic
//! multi-field updates must coordinate externally; the channel deliberately
//! takes no cross-field lock.

use std::sync::{Mutex, PoisonError};

use homenode_domain::config::{SettingSchema, SettingValue};
use homenode_domain::error::ConfigRejection;

struct Field {
    schema: SettingSchema,
    slot: Mutex<SettingValue>,
}

/// Bidirectional store of named, typed settings for one device.
pub struct ConfigChannel {
    fields: Vec<Field>,
}

impl ConfigChannel {
    /// Register a schema with its initial values.
    ///
    /// The field order given here is the order every
    /// [`snapshot`](Self::snapshot) reports.
    #[must_use]
    pub fn new(fields: Vec<(SettingSchema, SettingValue)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(schema, initial)| Field {
                    schema,
                    slot: Mutex::new(initial),
                })
                .collect(),
        }
    }

    fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.schema.name == name)
    }

    /// Apply an external write.
    ///
    /// Unknown names, non-controllable fields, and values that fail the
    /// schema's validation are warn-logged and leave the stored value
    /// unchanged — a reported-but-non-fatal condition, never a crash.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigRejection`] for callers that want to surface it;
    /// the transport is free to discard it.
    pub fn set(&self, name: &str, raw: &str) -> Result<(), ConfigRejection> {
        let result = self.try_set(name, raw);
        if let Err(rejection) = &result {
            tracing::warn!(setting = name, value = raw, %rejection, "config write ignored");
        }
        result
    }

    fn try_set(&self, name: &str, raw: &str) -> Result<(), ConfigRejection> {
        let Some(field) = self.field(name) else {
            return Err(ConfigRejection::UnknownSetting {
                name: name.to_string(),
            });
        };
        if !field.schema.controllable {
            return Err(ConfigRejection::NotControllable {
                name: name.to_string(),
            });
        }
        let value = field.schema.parse(raw)?;
        *field.slot.lock().unwrap_or_else(PoisonError::into_inner) = value;
        Ok(())
    }

    /// Node-side write of a reported value (live readings, room switches).
    ///
    /// Bypasses the controllable check; silently ignores unknown names, which
    /// would be a programming error caught by the node's own tests.
    pub fn publish(&self, name: &str, value: SettingValue) {
        if let Some(field) = self.field(name) {
            *field.slot.lock().unwrap_or_else(PoisonError::into_inner) = value;
        } else {
            tracing::debug!(setting = name, "publish to unregistered setting dropped");
        }
    }

    /// Current value of every setting, in schema order.
    ///
    /// Reads each slot independently; see the module docs for the relaxed
    /// cross-field consistency this implies.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SettingValue> {
        self.fields
            .iter()
            .map(|field| {
                field
                    .slot
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone()
            })
            .collect()
    }

    /// Registered schema, in report order.
    pub fn schema(&self) -> impl Iterator<Item = &SettingSchema> {
        self.fields.iter().map(|field| &field.schema)
    }

    /// Typed read of a numeric setting.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(|field| {
            field
                .slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .number()
        })
    }

    /// Typed read of an option code.
    #[must_use]
    pub fn code(&self, name: &str) -> Option<String> {
        self.field(name).and_then(|field| {
            field
                .slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .code()
                .map(ToString::to_string)
        })
    }
}
