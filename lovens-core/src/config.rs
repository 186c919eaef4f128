//! Client configuration.
//!
//! Configuration is optional: `AppConfig::default()` talks to the production
//! endpoints. A TOML file or string can override any field; nothing is read
//! implicitly from disk or the environment.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{LvError, LvResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// API and identity endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the telemetry API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL of the identity service.
    #[serde(default = "default_identity_base_url")]
    pub identity_base_url: String,

    /// OAuth client id.
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// OAuth client secret (empty for the public app client).
    #[serde(default)]
    pub client_secret: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive, e.g. "info" or "lovens_api=debug".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, logs go to the console only.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output for the file layer.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_api_base_url() -> String {
    constants::DEFAULT_API_BASE_URL.to_string()
}

fn default_identity_base_url() -> String {
    constants::DEFAULT_IDENTITY_BASE_URL.to_string()
}

fn default_client_id() -> String {
    constants::DEFAULT_CLIENT_ID.to_string()
}

fn default_request_timeout() -> u64 {
    constants::DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_connect_timeout() -> u64 {
    constants::DEFAULT_CONNECT_TIMEOUT_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            identity_base_url: default_identity_base_url(),
            client_id: default_client_id(),
            client_secret: String::new(),
            request_timeout_ms: default_request_timeout(),
            connect_timeout_ms: default_connect_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> LvResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> LvResult<Self> {
        let mut config: AppConfig = toml::from_str(contents)?;
        config.api.sanitize();
        Ok(config)
    }

    /// Serialize configuration back to TOML.
    pub fn to_toml_string(&self) -> LvResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| LvError::Config(format!("failed to serialize config: {e}")))
    }
}

impl ApiConfig {
    /// Config pointing both the API and the identity service at one origin.
    ///
    /// Useful for proxies and local mock servers.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = sanitize_base_url(base_url);
        Self {
            api_base_url: base.clone(),
            identity_base_url: base,
            ..Self::default()
        }
    }

    /// Normalize both base URLs in place.
    pub fn sanitize(&mut self) {
        self.api_base_url = sanitize_base_url(&self.api_base_url);
        self.identity_base_url = sanitize_base_url(&self.identity_base_url);
    }

    /// Request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Connect timeout as a Duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Sanitize and normalize a base URL.
///
/// Strips whitespace, surrounding quotes and trailing slashes; addresses
/// without a scheme get `https://`.
pub fn sanitize_base_url(address: &str) -> String {
    let trimmed = address.trim().trim_matches('"').trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    with_scheme.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.api_base_url, "https://lovens.api.bike.conneq.tech");
        assert_eq!(config.api.identity_base_url, "https://api.ids.conneq.tech");
        assert!(config.api.client_secret.is_empty());
        assert_eq!(config.api.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_sanitize_base_url() {
        assert_eq!(
            sanitize_base_url("lovens.api.bike.conneq.tech/"),
            "https://lovens.api.bike.conneq.tech"
        );
        assert_eq!(sanitize_base_url("http://127.0.0.1:8080//"), "http://127.0.0.1:8080");
        assert_eq!(
            sanitize_base_url("  \"https://example.com/\"  "),
            "https://example.com"
        );
        assert_eq!(sanitize_base_url("   "), "");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [api]
            api_base_url = "http://localhost:9000/"
            request_timeout_ms = 5000
            "#,
        )
        .unwrap();
        assert_eq!(config.api.api_base_url, "http://localhost:9000");
        assert_eq!(config.api.identity_base_url, "https://api.ids.conneq.tech");
        assert_eq!(config.api.request_timeout_ms, 5000);
        assert_eq!(config.api.connect_timeout_ms, 15_000);
    }

    #[test]
    fn test_with_base_url() {
        let api = ApiConfig::with_base_url("http://127.0.0.1:4000/");
        assert_eq!(api.api_base_url, "http://127.0.0.1:4000");
        assert_eq!(api.identity_base_url, "http://127.0.0.1:4000");
        assert_eq!(api.client_id, constants::DEFAULT_CLIENT_ID);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[api\nbroken").unwrap_err();
        assert!(matches!(err, LvError::Config(_)));
    }
}
