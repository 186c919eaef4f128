//! Ride models.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;

use lovens_core::error::{LvError, LvResult};

use crate::parse::{map_array, Fields, JsonMap};

/// One recorded ride.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ride {
    pub id: i64,
    pub bike_id: Option<i64>,
    pub start_date: DateTime<Tz>,
    /// Absent while the ride is still in progress.
    pub end_date: Option<DateTime<Tz>>,
    /// Distance in kilometers.
    pub distance_traveled: Option<f64>,
    pub extra: JsonMap,
}

impl Ride {
    /// Create a Ride from a server JSON map.
    pub fn from_server_map(map: &Value, tz: Tz) -> LvResult<Self> {
        let mut fields = Fields::new("ride", map)?;
        Ok(Self {
            id: fields.required_i64("id")?,
            bike_id: fields.optional_i64("bike_id")?,
            start_date: fields.required_datetime("start_date", tz)?,
            end_date: fields.optional_datetime("end_date", tz)?,
            distance_traveled: fields.optional_f64("distance_traveled")?,
            extra: fields.into_extra(),
        })
    }
}

/// One batch of rides as returned by the paged ride endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RidePage {
    pub rides: Vec<Ride>,
    /// Total number of rides on the server, when reported.
    pub total_records: Option<i64>,
}

impl RidePage {
    /// Map a `{"data": [...], "meta": {...}}` envelope.
    ///
    /// A bare array is accepted as well.
    pub fn from_server_map(value: &Value, tz: Tz) -> LvResult<Self> {
        let (data, meta) = match value {
            Value::Array(_) => (value, None),
            Value::Object(map) => (
                map.get("data").ok_or_else(|| {
                    LvError::Serialization("ride page: missing field `data`".into())
                })?,
                map.get("meta"),
            ),
            other => {
                return Err(LvError::Serialization(format!(
                    "ride page: unexpected payload {other}"
                )))
            }
        };

        let rides = map_array("ride", data, |v| Ride::from_server_map(v, tz))?;
        let total_records = meta
            .and_then(|m| m.get("total_records"))
            .and_then(Value::as_i64);

        Ok(Self {
            rides,
            total_records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Amsterdam;
    use serde_json::json;

    #[test]
    fn test_ride_from_server_map() {
        let ride = Ride::from_server_map(
            &json!({
                "id": "101",
                "bike_id": 12,
                "start_date": "2023-04-01T10:00:00+0200",
                "end_date": "2023-04-01T10:30:00+0200",
                "distance_traveled": 8.4,
                "calories": 210
            }),
            Amsterdam,
        )
        .unwrap();
        assert_eq!(ride.id, 101);
        assert_eq!(ride.end_date.unwrap() - ride.start_date, chrono::Duration::minutes(30));
        assert_eq!(ride.extra["calories"], 210);
    }

    #[test]
    fn test_ride_page_envelope() {
        let page = RidePage::from_server_map(
            &json!({
                "data": [{"id": 1, "start_date": "2023-04-01T10:00:00+0200"}],
                "meta": {"total_records": 120, "offset": 0, "limit": 50}
            }),
            Amsterdam,
        )
        .unwrap();
        assert_eq!(page.rides.len(), 1);
        assert_eq!(page.rides[0].end_date, None);
        assert_eq!(page.total_records, Some(120));
    }

    #[test]
    fn test_ride_page_bare_array() {
        let page = RidePage::from_server_map(&json!([]), Amsterdam).unwrap();
        assert!(page.rides.is_empty());
        assert_eq!(page.total_records, None);
    }
}
