//! User profile model.

use std::str::FromStr;

use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;

use lovens_core::error::{LvError, LvResult};

use crate::parse::{Fields, JsonMap};

/// The authenticated user, or the owner embedded in a bike record.
///
/// `timezone` is the subject timezone: naive dates and times passed to any
/// accessor are interpreted in it, and every timestamp in a response is
/// expressed in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub timezone: Tz,
    /// Fields not covered above, as sent by the server.
    pub extra: JsonMap,
}

impl User {
    /// Create a User from a server JSON map.
    pub fn from_server_map(map: &Value) -> LvResult<Self> {
        let mut fields = Fields::new("user", map)?;
        let id = fields.required_i64("id")?;
        let name = fields.optional_string("name")?;
        let email = fields.optional_string("email")?;
        let timezone = fields.required_string("timezone")?;
        let timezone = Tz::from_str(&timezone).map_err(|_| {
            LvError::Serialization(format!("user {id}: unknown timezone `{timezone}`"))
        })?;

        Ok(Self {
            id,
            name,
            email,
            timezone,
            extra: fields.into_extra(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_from_server_map() {
        let user = User::from_server_map(&json!({
            "id": 7,
            "name": "Ada",
            "email": "ada@example.com",
            "timezone": "Europe/Amsterdam",
            "locale": "nl"
        }))
        .unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.timezone, chrono_tz::Europe::Amsterdam);
        assert_eq!(user.extra["locale"], "nl");
        assert!(!user.extra.contains_key("timezone"));
    }

    #[test]
    fn test_user_unknown_timezone() {
        let err = User::from_server_map(&json!({"id": 1, "timezone": "Mars/Olympus"})).unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn test_user_requires_timezone() {
        assert!(User::from_server_map(&json!({"id": 1})).is_err());
    }
}
