//! Bike inventory and live state models.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;

use lovens_core::error::LvResult;

use super::geofence::Geofence;
use super::location::LocationPoint;
use super::user::User;
use crate::parse::{map_array, Fields, JsonMap};

/// A bike, with the sub-records the server embeds in it.
///
/// The embedded owner, last location and geofences are mapped exactly like
/// the standalone accessors would map them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bike {
    pub id: i64,
    pub name: Option<String>,
    /// Mapped like `get_user`, so an embedded owner without a `timezone`
    /// fails the whole bike.
    pub owning_user: Option<User>,
    pub last_location: Option<LocationPoint>,
    pub geofences: Vec<Geofence>,
    pub extra: JsonMap,
}

impl Bike {
    /// Create a Bike from a server JSON map.
    pub fn from_server_map(map: &Value, tz: Tz) -> LvResult<Self> {
        let mut fields = Fields::new("bike", map)?;
        let id = fields.required_i64("id")?;
        let name = fields.optional_string("name")?;
        let owning_user = fields
            .take_any(&["user", "owner"])
            .map(|v| User::from_server_map(&v))
            .transpose()?;
        let last_location = fields
            .take("last_location")
            .map(|v| LocationPoint::from_server_map(&v, tz))
            .transpose()?;
        let geofences = match fields.take("geofences") {
            Some(v) => Geofence::from_server_list(&v)?,
            None => Vec::new(),
        };

        Ok(Self {
            id,
            name,
            owning_user,
            last_location,
            geofences,
            extra: fields.into_extra(),
        })
    }

    pub fn from_server_list(value: &Value, tz: Tz) -> LvResult<Vec<Self>> {
        map_array("bike", value, |v| Self::from_server_map(v, tz))
    }
}

/// Live state of a bike.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BikeState {
    pub powered_on: Option<bool>,
    pub locked: Option<bool>,
    pub charging: Option<bool>,
    pub battery_percentage: Option<u8>,
    pub last_seen: Option<DateTime<Tz>>,
    pub extra: JsonMap,
}

impl BikeState {
    /// Create a BikeState from a server JSON map.
    pub fn from_server_map(map: &Value, tz: Tz) -> LvResult<Self> {
        let mut fields = Fields::new("bike state", map)?;
        Ok(Self {
            powered_on: fields.optional_bool("powered_on")?,
            locked: fields.optional_bool("locked")?,
            charging: fields.optional_bool("charging")?,
            battery_percentage: fields.optional_percentage("battery_percentage")?,
            last_seen: fields.optional_datetime("last_seen", tz)?,
            extra: fields.into_extra(),
        })
    }
}
