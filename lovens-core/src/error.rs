//! Error types for the Lovens client.
//!
//! Every failure is surfaced to the caller as an `LvError`. Nothing in the
//! client catches or retries an error, so the variants carry enough context
//! (status, endpoint, server message) for the caller to pick a retry policy.

use thiserror::Error;

/// Convenience type alias for Results using LvError.
pub type LvResult<T> = Result<T, LvError>;

/// Unified error type for the Lovens client.
#[derive(Error, Debug)]
pub enum LvError {
    // -- Session errors --
    /// Login was rejected, or a call was made without a valid session.
    ///
    /// `status` is `None` when the failure was detected locally (no token).
    #[error("authentication failed{}: {message}", status_suffix(.status))]
    Authentication {
        /// HTTP status returned by the server, if any.
        status: Option<u16>,
        /// Server message or local reason.
        message: String,
    },

    /// The API answered with a non-success status other than 401/403.
    #[error("api error (status {status}) on {endpoint}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Path of the endpoint that failed.
        endpoint: String,
        /// Raw response body.
        body: String,
    },

    // -- Usage errors --
    /// The caller supplied arguments the client cannot act on.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // -- Network errors --
    /// HTTP request failed before a response was received.
    #[error("http error: {0}")]
    Http(String),

    /// HTTP request timed out.
    #[error("request timeout: {0}")]
    Timeout(String),

    // -- Decoding / configuration --
    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Failed to load or parse configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl LvError {
    /// Build an authentication error detected without a server round trip.
    pub fn not_authenticated() -> Self {
        LvError::Authentication {
            status: None,
            message: "not authenticated, call login first".into(),
        }
    }

    /// Whether this error means the session must be re-established by login.
    pub fn is_authentication(&self) -> bool {
        matches!(self, LvError::Authentication { .. })
    }

    /// The HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            LvError::Authentication { status, .. } => *status,
            LvError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LvError {
    fn from(e: serde_json::Error) -> Self {
        LvError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for LvError {
    fn from(e: toml::de::Error) -> Self {
        LvError::Config(e.to_string())
    }
}
