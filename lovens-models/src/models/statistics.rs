//! Aggregated ride statistics.

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;

use lovens_core::error::{LvError, LvResult};

use crate::parse::{map_array, Fields, JsonMap};

/// Width of a statistics bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hourly,
    Daily,
    Monthly,
}

impl Granularity {
    /// Value of the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Hourly => "hourly",
            Granularity::Daily => "daily",
            Granularity::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = LvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Ok(Granularity::Hourly),
            "daily" => Ok(Granularity::Daily),
            "monthly" => Ok(Granularity::Monthly),
            other => Err(LvError::InvalidArgument(format!(
                "unknown statistics granularity `{other}`, expected hourly, daily or monthly"
            ))),
        }
    }
}

/// Aggregate ride metrics over one bin.
///
/// Bins cover `from..=till`; the last bin of a window ends at the requested
/// end boundary rather than at its natural edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsBin {
    pub from: DateTime<Tz>,
    pub till: DateTime<Tz>,
    /// Number of rides started in the bin.
    pub rides: i64,
    /// Distance in kilometers.
    pub distance_traveled: f64,
    /// Riding time in seconds.
    pub duration: i64,
    pub extra: JsonMap,
}

impl StatisticsBin {
    /// Create a StatisticsBin from a server JSON map.
    ///
    /// Empty bins may omit their metrics; those read as zero.
    pub fn from_server_map(map: &Value, tz: Tz) -> LvResult<Self> {
        let mut fields = Fields::new("statistics", map)?;
        Ok(Self {
            from: fields.required_datetime("from", tz)?,
            till: fields.required_datetime("till", tz)?,
            rides: fields.optional_i64("rides")?.unwrap_or(0),
            distance_traveled: fields.optional_f64("distance_traveled")?.unwrap_or(0.0),
            duration: fields.optional_i64("duration")?.unwrap_or(0),
            extra: fields.into_extra(),
        })
    }

    pub fn from_server_list(value: &Value, tz: Tz) -> LvResult<Vec<Self>> {
        map_array("statistics", value, |v| Self::from_server_map(v, tz))
    }

    /// Whether nothing was recorded in this bin.
    pub fn is_empty(&self) -> bool {
        self.rides == 0 && self.duration == 0 && self.distance_traveled == 0.0
    }
}
