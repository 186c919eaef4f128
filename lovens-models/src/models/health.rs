//! Bike health diagnostics.
//!
//! The health endpoint reports a list of tagged readings. The client always
//! surfaces the same four, in a fixed order, whatever subset the server sent.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use lovens_core::error::{LvError, LvResult};

use crate::parse::{map_array, parse_server_datetime, Fields, JsonMap};

/// Which diagnostic a health item reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthKind {
    /// Last time the bike connected to the backend.
    Connection,
    /// Last GPS fix.
    GpsFix,
    /// Charge state of the GPS unit's own battery.
    GpsBattery,
    /// Whether the onboard system reports healthy.
    OnboardSystem,
}

impl HealthKind {
    /// All kinds, in the order `get_health` returns them.
    pub const ALL: [HealthKind; 4] = [
        HealthKind::Connection,
        HealthKind::GpsFix,
        HealthKind::GpsBattery,
        HealthKind::OnboardSystem,
    ];

    /// `key_name` of the item on the wire.
    pub fn key_name(&self) -> &'static str {
        match self {
            HealthKind::Connection => "connection",
            HealthKind::GpsFix => "gps_fix",
            HealthKind::GpsBattery => "gps_battery",
            HealthKind::OnboardSystem => "system",
        }
    }

    /// Type the value of this item is declared with.
    pub fn value_type(&self) -> HealthValueType {
        match self {
            HealthKind::Connection | HealthKind::GpsFix => HealthValueType::DateTime,
            HealthKind::GpsBattery => HealthValueType::String,
            HealthKind::OnboardSystem => HealthValueType::Bool,
        }
    }
}

/// Declared type of a health item value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthValueType {
    DateTime,
    String,
    Bool,
}

impl HealthValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthValueType::DateTime => "datetime",
            HealthValueType::String => "string",
            HealthValueType::Bool => "bool",
        }
    }
}

/// A health item value, interpreted per its declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HealthValue {
    DateTime(DateTime<Tz>),
    String(String),
    Bool(bool),
    /// The server did not report this reading.
    Null,
}

impl HealthValue {
    fn parse(raw: Option<Value>, value_type: HealthValueType, tz: Tz) -> LvResult<Self> {
        let Some(raw) = raw else {
            return Ok(HealthValue::Null);
        };
        match value_type {
            HealthValueType::DateTime => parse_server_datetime(&raw, tz).map(HealthValue::DateTime),
            HealthValueType::String => Ok(HealthValue::String(match raw {
                Value::String(s) => s,
                other => other.to_string(),
            })),
            HealthValueType::Bool => match raw {
                Value::Bool(b) => Ok(HealthValue::Bool(b)),
                other => Err(LvError::Serialization(format!(
                    "health: expected boolean value, got {other}"
                ))),
            },
        }
    }
}

/// One of the four fixed diagnostic readings of a bike.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthItem {
    pub kind: HealthKind,
    pub value_type: HealthValueType,
    pub value: HealthValue,
    pub extra: JsonMap,
}

impl HealthItem {
    /// Build the four health items from the server's item list.
    ///
    /// Items are matched on `key_name`; unknown items are skipped and a
    /// missing item comes back with a `Null` value.
    pub fn from_server_list(value: &Value, tz: Tz) -> LvResult<Vec<Self>> {
        let mut raw_items = map_array("health", value, |v| {
            let mut fields = Fields::new("health item", v)?;
            let key = fields.required_string("key_name")?;
            Ok((key, fields))
        })?;

        let items = HealthKind::ALL
            .iter()
            .map(|kind| {
                let position = raw_items.iter().position(|(key, _)| key == kind.key_name());
                match position {
                    Some(index) => {
                        let (_, fields) = raw_items.swap_remove(index);
                        Self::from_fields(*kind, fields, tz)
                    }
                    None => Ok(Self {
                        kind: *kind,
                        value_type: kind.value_type(),
                        value: HealthValue::Null,
                        extra: JsonMap::new(),
                    }),
                }
            })
            .collect::<LvResult<Vec<_>>>()?;

        for (key, _) in &raw_items {
            debug!("ignoring unknown health item `{key}`");
        }

        Ok(items)
    }

    fn from_fields(kind: HealthKind, mut fields: Fields, tz: Tz) -> LvResult<Self> {
        let value_type = match fields.optional_string("type")?.as_deref() {
            Some("datetime") => HealthValueType::DateTime,
            Some("string") => HealthValueType::String,
            Some("bool") | Some("boolean") => HealthValueType::Bool,
            _ => kind.value_type(),
        };
        let value = HealthValue::parse(fields.take("value"), value_type, tz)?;

        Ok(Self {
            kind,
            value_type,
            value,
            extra: fields.into_extra(),
        })
    }
}
