//! Client-wide constants.

/// Client name sent in the `User-Agent` header.
pub const CLIENT_NAME: &str = "lovens-rs";

/// Client version.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default base URL of the bike telemetry API.
pub const DEFAULT_API_BASE_URL: &str = "https://lovens.api.bike.conneq.tech";

/// Default base URL of the identity service that issues bearer tokens.
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://api.ids.conneq.tech";

/// Public OAuth client id of the Lovens app.
pub const DEFAULT_CLIENT_ID: &str = "7d5d1a2a-3f6e-45c6-9e9e-b0b5f224f8a5";

/// Default request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default connect timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 15_000;

/// Wire format of timestamps, both in query parameters and in responses.
pub const WIRE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Default number of rides fetched per batch by the ride iterator.
pub const DEFAULT_RIDE_BATCH_SIZE: u32 = 50;

/// Length of the default battery statistics window, in hours.
pub const BATTERY_STATISTICS_WINDOW_HOURS: i64 = 24;

/// Login page origin expected by the identity provider.
pub mod login_page {
    pub const COGNITO_ORIGIN: &str = "https://login.conneq.tech";
    pub const IDS_ORIGIN: &str = "https://login.ids.conneq.tech";
}

/// `User-Agent` header value, e.g. `lovens-rs 0.1.0`.
pub fn user_agent() -> String {
    format!("{CLIENT_NAME} {CLIENT_VERSION}")
}
