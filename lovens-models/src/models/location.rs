//! Location trace points.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;

use lovens_core::error::LvResult;

use crate::parse::{map_array, Fields, JsonMap};

/// One GPS fix of a bike.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationPoint {
    pub date: DateTime<Tz>,
    pub latitude: f64,
    pub longitude: f64,
    /// Speed in km/h, when reported.
    pub speed: Option<f64>,
    /// Server placeholder, reported as 0 in practice. Passed through as sent
    /// and 0 when absent.
    ///
    /// Use the battery accessors for real charge levels.
    pub battery_percentage: u8,
    pub extra: JsonMap,
}

impl LocationPoint {
    /// Create a LocationPoint from a server JSON map.
    pub fn from_server_map(map: &Value, tz: Tz) -> LvResult<Self> {
        let mut fields = Fields::new("location", map)?;
        let date = fields.required_datetime("date", tz)?;
        let latitude = fields.required_f64_any(&["lat", "latitude"])?;
        let longitude = fields.required_f64_any(&["lon", "lng", "longitude"])?;
        let speed = fields.optional_f64("speed")?;
        let battery_percentage = fields.optional_percentage("battery_percentage")?.unwrap_or(0);

        Ok(Self {
            date,
            latitude,
            longitude,
            speed,
            battery_percentage,
            extra: fields.into_extra(),
        })
    }

    /// Map a location trace, sorted by time.
    pub fn from_server_list(value: &Value, tz: Tz) -> LvResult<Vec<Self>> {
        let mut points = map_array("location", value, |v| Self::from_server_map(v, tz))?;
        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}
