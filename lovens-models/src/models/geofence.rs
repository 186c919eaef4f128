//! Geofence models.

use serde::Serialize;
use serde_json::Value;

use lovens_core::error::{LvError, LvResult};

use crate::parse::{map_array, Fields, JsonMap};

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    fn from_server_map(map: &Value) -> LvResult<Self> {
        let mut fields = Fields::new("geofence center", map)?;
        Ok(Self {
            latitude: fields.required_f64_any(&["lat", "latitude"])?,
            longitude: fields.required_f64_any(&["lon", "lng", "longitude"])?,
        })
    }
}

/// A named circular region tied to a bike.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geofence {
    pub id: i64,
    pub bike_id: Option<i64>,
    pub name: Option<String>,
    pub center: GeoPoint,
    /// Radius in meters.
    pub radius: f64,
    pub extra: JsonMap,
}

impl Geofence {
    /// Create a Geofence from a server JSON map.
    pub fn from_server_map(map: &Value) -> LvResult<Self> {
        let mut fields = Fields::new("geofence", map)?;
        let id = fields.required_i64("id")?;
        let bike_id = fields.optional_i64("bike_id")?;
        let name = fields.optional_string("name")?;
        let center = fields
            .take("center")
            .ok_or_else(|| LvError::Serialization(format!("geofence {id}: missing field `center`")))?;
        let center = GeoPoint::from_server_map(&center)?;
        let radius = fields.required_f64_any(&["radius"])?;

        Ok(Self {
            id,
            bike_id,
            name,
            center,
            radius,
            extra: fields.into_extra(),
        })
    }

    pub fn from_server_list(value: &Value) -> LvResult<Vec<Self>> {
        map_array("geofence", value, Self::from_server_map)
    }
}

/// Entry counts for one geofence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeofenceStats {
    pub entries_all_time: i64,
    /// Only ever set when the stats were requested for a time window, and
    /// then only if the server reported it.
    pub entries_in_timespan: Option<i64>,
    pub extra: JsonMap,
}

impl GeofenceStats {
    /// Create GeofenceStats from a server JSON map.
    ///
    /// `windowed` tells whether a time window was sent. Without one, a stray
    /// windowed count is dropped.
    pub fn from_server_map(map: &Value, windowed: bool) -> LvResult<Self> {
        let mut fields = Fields::new("geofence stats", map)?;
        let entries_all_time = fields.required_i64("entries_all_time")?;
        let entries_in_timespan = if windowed {
            fields.optional_i64("entries_in_timespan")?
        } else {
            fields.take("entries_in_timespan");
            None
        };

        Ok(Self {
            entries_all_time,
            entries_in_timespan,
            extra: fields.into_extra(),
        })
    }
}
