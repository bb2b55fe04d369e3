//! User preference store.
//!
//! Holds the single shared [`Preferences`] record that the persona prompt is
//! rendered from. The store is owned by the application state and handed to
//! handlers, never kept in a global.

use std::sync::RwLock;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};
use thiserror::Error;

/// Preference update errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("Unknown preference field: {0}")]
    UnknownField(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// A named trigger and the actions it runs, e.g. "going to sleep".
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub trigger: String,
    pub actions: Vec<String>,
}

impl Schedule {
    fn new(trigger: &str, actions: &[&str]) -> Self {
        Self {
            trigger: trigger.to_string(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Device and routine preferences for the household.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub common_devices: Vec<String>,
    pub preferred_temperature: Number,
    pub usage_history: Vec<String>,
    /// Serialized as a JSON object keyed by trigger, in insertion order.
    #[serde(serialize_with = "serialize_schedules")]
    pub schedules: Vec<Schedule>,
}

fn serialize_schedules<S: Serializer>(
    schedules: &[Schedule],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(schedules.len()))?;
    for schedule in schedules {
        map.serialize_entry(&schedule.trigger, &schedule.actions)?;
    }
    map.end()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            common_devices: vec![
                "Air Conditioner".to_string(),
                "Light".to_string(),
                "Curtain".to_string(),
            ],
            preferred_temperature: Number::from(26),
            usage_history: vec![
                "User often turns on Air Conditioner to 26°C when arriving home".to_string(),
                "User usually opens the curtains in the morning".to_string(),
                "User prefers lights at 80% brightness in the evening".to_string(),
                "User turns on the dehumidifier when humidity is above 70%".to_string(),
            ],
            schedules: vec![
                Schedule::new(
                    "arriving home",
                    &[
                        "Air Conditioner at 26°C",
                        "Living room lights",
                        "Entry hallway lights",
                    ],
                ),
                Schedule::new(
                    "leaving home",
                    &["Turn off all lights", "Set AC to energy-saving mode"],
                ),
                Schedule::new(
                    "going to sleep",
                    &["Turn off all lights", "Close curtains", "Set AC to 28°C"],
                ),
                Schedule::new(
                    "waking up",
                    &["Open curtains", "Turn on bedroom light at 50%"],
                ),
            ],
        }
    }
}

/// A single-field replacement of the stored preferences.
#[derive(Debug, Clone, PartialEq)]
pub enum PreferenceUpdate {
    Temperature(Number),
    Devices(Vec<String>),
}

impl PreferenceUpdate {
    /// Build an update from the wire form `{ "type": kind, "value": value }`.
    pub fn parse(kind: &str, value: Value) -> Result<Self, PreferenceError> {
        match kind {
            "temperature" => match value {
                Value::Number(n) => Ok(Self::Temperature(n)),
                other => Err(PreferenceError::InvalidValue {
                    field: "temperature",
                    reason: format!("expected a number, got {}", json_kind(&other)),
                }),
            },
            "devices" => {
                let Value::Array(items) = value else {
                    return Err(PreferenceError::InvalidValue {
                        field: "devices",
                        reason: format!("expected an array, got {}", json_kind(&value)),
                    });
                };
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s),
                        other => Err(PreferenceError::InvalidValue {
                            field: "devices",
                            reason: format!("expected strings, got {}", json_kind(&other)),
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Self::Devices)
            }
            other => Err(PreferenceError::UnknownField(other.to_string())),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Shared, lock-guarded preference record.
#[derive(Debug, Default)]
pub struct PreferenceStore {
    inner: RwLock<Preferences>,
}

impl PreferenceStore {
    /// Create a store seeded with [`Preferences::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given preferences.
    pub fn with_preferences(preferences: Preferences) -> Self {
        Self {
            inner: RwLock::new(preferences),
        }
    }

    /// Snapshot of the current preferences.
    pub fn get(&self) -> Preferences {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace exactly the field named by `update` and return the new snapshot.
    pub fn update(&self, update: PreferenceUpdate) -> Preferences {
        let mut prefs = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match update {
            PreferenceUpdate::Temperature(t) => prefs.preferred_temperature = t,
            PreferenceUpdate::Devices(d) => prefs.common_devices = d,
        }
        prefs.clone()
    }
}
