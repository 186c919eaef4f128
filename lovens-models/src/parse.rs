//! Field extraction shared by every record mapping.
//!
//! Server payloads are open: records read the documented fields out of the
//! JSON object and keep whatever is left as their `extra` map.

use chrono::{DateTime, FixedOffset, TimeZone};
use chrono_tz::Tz;
use serde_json::Value;

use lovens_core::constants::WIRE_DATETIME_FORMAT;
use lovens_core::error::{LvError, LvResult};

/// JSON object as returned by the server.
pub type JsonMap = serde_json::Map<String, Value>;

/// Parse a server timestamp and express it in `tz`.
///
/// Accepts the wire format (`2023-04-01T00:00:00+0200`), RFC 3339, and epoch
/// seconds.
pub fn parse_server_datetime(value: &Value, tz: Tz) -> LvResult<DateTime<Tz>> {
    match value {
        Value::String(s) => parse_datetime_str(s)
            .map(|dt| dt.with_timezone(&tz))
            .ok_or_else(|| LvError::Serialization(format!("unrecognized timestamp: {s}"))),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| tz.timestamp_opt(secs, 0).single())
            .ok_or_else(|| LvError::Serialization(format!("invalid epoch timestamp: {n}"))),
        other => Err(LvError::Serialization(format!(
            "expected timestamp, got {other}"
        ))),
    }
}

fn parse_datetime_str(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(s, WIRE_DATETIME_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .ok()
}

/// Normalize a percentage to an integer in 0..=100.
///
/// Fractions are rounded; out-of-range values are clamped.
pub fn normalize_percentage(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(raw.round().clamp(0.0, 100.0) as u8)
}

/// A server object being taken apart into a record.
pub struct Fields {
    record: &'static str,
    map: JsonMap,
}

impl Fields {
    /// Start reading `value`, which must be a JSON object.
    pub fn new(record: &'static str, value: &Value) -> LvResult<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                record,
                map: map.clone(),
            }),
            other => Err(LvError::Serialization(format!(
                "{record}: expected object, got {}",
                type_name(other)
            ))),
        }
    }

    /// Remove a field. JSON null counts as absent.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.map.remove(key).filter(|v| !v.is_null())
    }

    /// Remove the first present field among `keys`; the others are dropped too.
    pub fn take_any(&mut self, keys: &[&str]) -> Option<Value> {
        let mut found = None;
        for key in keys {
            let value = self.take(key);
            if found.is_none() {
                found = value;
            }
        }
        found
    }

    fn missing(&self, key: &str) -> LvError {
        LvError::Serialization(format!("{}: missing field `{key}`", self.record))
    }

    fn invalid(&self, key: &str, expected: &str, got: &Value) -> LvError {
        LvError::Serialization(format!(
            "{}: field `{key}` should be {expected}, got {got}",
            self.record
        ))
    }

    pub fn optional_i64(&mut self, key: &str) -> LvResult<Option<i64>> {
        match self.take(key) {
            None => Ok(None),
            Some(v) => value_as_i64(&v)
                .map(Some)
                .ok_or_else(|| self.invalid(key, "an integer", &v)),
        }
    }

    pub fn required_i64(&mut self, key: &str) -> LvResult<i64> {
        self.optional_i64(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn optional_f64(&mut self, key: &str) -> LvResult<Option<f64>> {
        self.optional_f64_any(&[key])
    }

    pub fn optional_f64_any(&mut self, keys: &[&str]) -> LvResult<Option<f64>> {
        match self.take_any(keys) {
            None => Ok(None),
            Some(v) => value_as_f64(&v)
                .map(Some)
                .ok_or_else(|| self.invalid(keys[0], "a number", &v)),
        }
    }

    pub fn required_f64_any(&mut self, keys: &[&str]) -> LvResult<f64> {
        self.optional_f64_any(keys)?
            .ok_or_else(|| self.missing(keys[0]))
    }

    pub fn optional_string(&mut self, key: &str) -> LvResult<Option<String>> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(v) => Err(self.invalid(key, "a string", &v)),
        }
    }

    pub fn required_string(&mut self, key: &str) -> LvResult<String> {
        self.optional_string(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn optional_bool(&mut self, key: &str) -> LvResult<Option<bool>> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(Value::Number(n)) if n.as_i64() == Some(0) || n.as_i64() == Some(1) => {
                Ok(Some(n.as_i64() == Some(1)))
            }
            Some(v) => Err(self.invalid(key, "a boolean", &v)),
        }
    }

    pub fn optional_datetime(&mut self, key: &str, tz: Tz) -> LvResult<Option<DateTime<Tz>>> {
        match self.take(key) {
            None => Ok(None),
            Some(v) => parse_server_datetime(&v, tz).map(Some).map_err(|e| {
                LvError::Serialization(format!("{}: field `{key}`: {e}", self.record))
            }),
        }
    }

    pub fn required_datetime(&mut self, key: &str, tz: Tz) -> LvResult<DateTime<Tz>> {
        self.optional_datetime(key, tz)?
            .ok_or_else(|| self.missing(key))
    }

    /// Percentage in 0..=100; absent or null stays `None`, never zero.
    pub fn optional_percentage(&mut self, key: &str) -> LvResult<Option<u8>> {
        match self.take(key) {
            None => Ok(None),
            Some(v) => normalize_percentage(&v)
                .map(Some)
                .ok_or_else(|| self.invalid(key, "a percentage", &v)),
        }
    }

    /// Whatever fields were not taken.
    pub fn into_extra(self) -> JsonMap {
        self.map
    }
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Map every element of a JSON array with `f`.
pub fn map_array<T>(
    record: &'static str,
    value: &Value,
    f: impl Fn(&Value) -> LvResult<T>,
) -> LvResult<Vec<T>> {
    match value {
        Value::Array(items) => items.iter().map(f).collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(LvError::Serialization(format!(
            "{record}: expected array, got {}",
            type_name(other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use chrono_tz::Europe::Amsterdam;
    use serde_json::json;

    #[test]
    fn test_parse_wire_datetime_converts_to_subject_tz() {
        let dt = parse_server_datetime(&json!("2023-04-01T10:00:00+0000"), Amsterdam).unwrap();
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.timezone(), Amsterdam);
    }

    #[test]
    fn test_parse_rfc3339_and_epoch() {
        let a = parse_server_datetime(&json!("2023-04-01T12:00:00+02:00"), Amsterdam).unwrap();
        let b = parse_server_datetime(&json!(1_680_343_200), Amsterdam).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.date_naive(),
            NaiveDate::from_ymd_opt(2023, 4, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_garbage_datetime() {
        assert!(parse_server_datetime(&json!("yesterday"), Amsterdam).is_err());
        assert!(parse_server_datetime(&json!(true), Amsterdam).is_err());
    }

    #[test]
    fn test_normalize_percentage() {
        assert_eq!(normalize_percentage(&json!(87)), Some(87));
        assert_eq!(normalize_percentage(&json!(42.6)), Some(43));
        assert_eq!(normalize_percentage(&json!("55")), Some(55));
        assert_eq!(normalize_percentage(&json!(130)), Some(100));
        assert_eq!(normalize_percentage(&json!(-3)), Some(0));
        assert_eq!(normalize_percentage(&json!(null)), None);
    }

    #[test]
    fn test_fields_keep_unknown_keys() {
        let value = json!({"id": "12", "name": "x", "color": "red", "gone": null});
        let mut fields = Fields::new("thing", &value).unwrap();
        assert_eq!(fields.required_i64("id").unwrap(), 12);
        assert_eq!(fields.optional_string("name").unwrap().as_deref(), Some("x"));
        assert_eq!(fields.optional_string("gone").unwrap(), None);
        let extra = fields.into_extra();
        assert_eq!(extra.len(), 1);
        assert_eq!(extra["color"], "red");
    }

    #[test]
    fn test_fields_missing_required() {
        let mut fields = Fields::new("thing", &json!({})).unwrap();
        let err = fields.required_i64("id").unwrap_err();
        assert!(err.to_string().contains("missing field `id`"));
    }

    #[test]
    fn test_fields_rejects_non_object() {
        assert!(Fields::new("thing", &json!([1, 2])).is_err());
    }

    #[test]
    fn test_take_any_prefers_first_key() {
        let mut fields = Fields::new("point", &json!({"lat": 1.5, "latitude": 2.5})).unwrap();
        assert_eq!(fields.required_f64_any(&["lat", "latitude"]).unwrap(), 1.5);
        assert!(fields.into_extra().is_empty());
    }
}
