//! Battery models.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;

use lovens_core::error::LvResult;

use crate::parse::{map_array, Fields, JsonMap};

/// Current battery reading of a bike.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryState {
    /// `None` when no battery is mounted.
    pub battery_percentage: Option<u8>,
    pub charging: Option<bool>,
    pub date: Option<DateTime<Tz>>,
    pub extra: JsonMap,
}

impl BatteryState {
    /// Create a BatteryState from a server JSON map.
    pub fn from_server_map(map: &Value, tz: Tz) -> LvResult<Self> {
        let mut fields = Fields::new("battery state", map)?;
        Ok(Self {
            battery_percentage: fields.optional_percentage("battery_percentage")?,
            charging: fields.optional_bool("charging")?,
            date: fields.optional_datetime("date", tz)?,
            extra: fields.into_extra(),
        })
    }
}

/// One 15-minute battery statistics bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatterySample {
    pub date: DateTime<Tz>,
    /// `None` for buckets where the battery was removed from the bike.
    pub battery_percentage: Option<u8>,
    pub charging: Option<bool>,
    pub extra: JsonMap,
}

impl BatterySample {
    /// Create a BatterySample from a server JSON map.
    pub fn from_server_map(map: &Value, tz: Tz) -> LvResult<Self> {
        let mut fields = Fields::new("battery sample", map)?;
        Ok(Self {
            date: fields.required_datetime("date", tz)?,
            battery_percentage: fields.optional_percentage("battery_percentage")?,
            charging: fields.optional_bool("charging")?,
            extra: fields.into_extra(),
        })
    }

    pub fn from_server_list(value: &Value, tz: Tz) -> LvResult<Vec<Self>> {
        map_array("battery sample", value, |v| Self::from_server_map(v, tz))
    }

    /// Whether the battery was mounted during this bucket.
    pub fn battery_present(&self) -> bool {
        self.battery_percentage.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Amsterdam;
    use serde_json::json;

    #[test]
    fn test_removed_battery_is_none_not_zero() {
        let samples = BatterySample::from_server_list(
            &json!([
                {"date": "2023-04-01T10:00:00+0200", "battery_percentage": 0},
                {"date": "2023-04-01T10:15:00+0200", "battery_percentage": null},
                {"date": "2023-04-01T10:30:00+0200"}
            ]),
            Amsterdam,
        )
        .unwrap();
        assert_eq!(samples[0].battery_percentage, Some(0));
        assert!(samples[0].battery_present());
        assert_eq!(samples[1].battery_percentage, None);
        assert_eq!(samples[2].battery_percentage, None);
    }

    #[test]
    fn test_battery_state() {
        let state = BatteryState::from_server_map(
            &json!({"battery_percentage": 81, "charging": true, "cycles": 42}),
            Amsterdam,
        )
        .unwrap();
        assert_eq!(state.battery_percentage, Some(81));
        assert_eq!(state.charging, Some(true));
        assert_eq!(state.date, None);
        assert_eq!(state.extra["cycles"], 42);
    }
}
